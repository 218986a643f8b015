use clap::{Parser, Subcommand};
use error_stack::{Report, Result, ResultExt};
use thiserror::Error;
use yatube::{
    config::Server as Config,
    database::{Data, PgData, Pool},
    schema::NewGroup,
    util::validation::{is_valid_slug, SLUG_MAX},
};

/// Manage post groups
#[derive(Debug, Parser)]
pub struct GroupCommand {
    #[command(subcommand)]
    pub action: GroupAction,
}

#[derive(Debug, Subcommand)]
pub enum GroupAction {
    /// Create a new group
    Create {
        #[clap(long)]
        title: String,
        #[clap(long)]
        slug: String,
        #[clap(long, default_value = "")]
        description: String,
    },
}

#[derive(Debug, Error)]
#[error("Failed to manage groups")]
pub struct GroupError;

const TITLE_MAX: usize = 200;

pub fn run(args: GroupCommand) -> Result<(), GroupError> {
    let GroupAction::Create {
        title,
        slug,
        description,
    } = args.action;

    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX {
        return Err(Report::new(GroupError))
            .attach_printable(format!("title must have 1 to {TITLE_MAX} characters"));
    }
    if !is_valid_slug(&slug) {
        return Err(Report::new(GroupError)).attach_printable(format!(
            "slug must have at most {SLUG_MAX} letters, digits, hyphens or underscores"
        ));
    }

    let config = Config::load().change_context(GroupError)?;
    yatube::telemetry::init(&config.logging).change_context(GroupError)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .change_context(GroupError)
        .attach_printable("could not build tokio runtime")?
        .block_on(async {
            let pool = Pool::new(&config.db).await.change_context(GroupError)?;
            let data = PgData::new(pool);
            let group = data
                .create_group(&NewGroup {
                    title,
                    slug: &slug,
                    description: description.trim(),
                })
                .await
                .change_context(GroupError)?;

            match group {
                Some(group) => {
                    println!("Created group {:?} (/group/{}/)", group.title, group.slug);
                    Ok::<_, Report<GroupError>>(())
                }
                None => Err(Report::new(GroupError))
                    .attach_printable(format!("slug {slug:?} is already taken")),
            }
        })
}
