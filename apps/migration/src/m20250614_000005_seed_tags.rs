use sea_orm_migration::prelude::*;
use uuid::Uuid;

use super::m20250614_000004_create_tags_table::Tags;

/// The fixed tag vocabulary. Tags are seeded once and never mutated at
/// runtime; the post form offers exactly this list.
const TAG_NAMES: &[&str] = &[
    "Laravel",
    "React",
    "WebDev",
    "Tutorial",
    "PHP",
    "JavaScript",
    "CSS",
    "HTML",
    "TypeScript",
    "API",
    "Backend",
    "Frontend",
    "DevOps",
    "Database",
    "Security",
    "Testing",
    "UX/UI",
    "Open Source",
    "Cloud",
    "Docker",
    "Git",
    "Performance",
    "Mobile",
    "Design Patterns",
    "AI",
    "Machine Learning",
    "Career",
    "Productivity",
    "Freelancing",
    "Remote Work",
    "Work-Life Balance",
    "Learning",
    "Motivation",
    "Community",
    "Events",
    "News",
    "Reviews",
    "Opinion",
    "Inspiration",
    "Interviews",
    "Case Study",
    "Trends",
    "Personal Development",
    "Collaboration",
    "Open Discussion",
    "Mental Health",
    "Creativity",
    "Storytelling",
    "Book Reviews",
    "Movie Reviews",
    "Productivity Hacks",
    "Time Management",
    "Networking",
    "Leadership",
    "Teamwork",
    "Communication",
    "Public Speaking",
    "Mindfulness",
    "Habits",
    "Goal Setting",
    "Success Stories",
    "Failure Stories",
    "Challenges",
    "Advice",
    "Resources",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert()
            .into_table(Tags::Table)
            .columns([Tags::Id, Tags::Name, Tags::CreatedAt, Tags::UpdatedAt])
            .to_owned();

        for name in TAG_NAMES {
            insert.values_panic([
                Uuid::new_v4().into(),
                (*name).into(),
                Expr::current_timestamp().into(),
                Expr::current_timestamp().into(),
            ]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Tags::Table).to_owned())
            .await
    }
}
