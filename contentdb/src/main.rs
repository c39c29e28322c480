// contentdb - inspect and render stored content from the command line
// Entry point and application setup

use anyhow::{bail, Context};
use contentdb::config::DATABASE_FILE_NAME;
use contentdb::database::{self, EntryOptions, ListCriteria, Repository};
use contentdb::filter::FilterKind;
use contentdb::services::{ContentModule, ContentService, Renderer, SettingsService};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: contentdb <data-dir> <install|uninstall|export|filters|user <acronym> [name]|list [type]|entries [type]|show <id|key>>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contentdb=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (data_dir, command, rest) = match args.as_slice() {
        [dir, command, rest @ ..] => (PathBuf::from(dir), command.as_str(), rest),
        _ => bail!(USAGE),
    };

    tracing::info!("Starting contentdb in {:?}", data_dir);

    let settings_service = SettingsService::new(data_dir.clone());
    let settings = settings_service
        .load()
        .await
        .context("Failed to load settings")?;

    let pool = database::create_pool(&data_dir.join(DATABASE_FILE_NAME))
        .await
        .context("Failed to open database")?;
    let repo = Repository::new(pool);

    if let Ok(action) = command.parse() {
        println!("{}", ContentModule::new(repo).manage(action).await?);
        return Ok(());
    }

    if let ("user", [acronym, name @ ..]) = (command, rest) {
        let id = repo
            .create_user(acronym, name.first().map(String::as_str))
            .await?;
        let user = repo
            .get_user(id)
            .await?
            .context("Created user could not be read back")?;
        println!("{:>5}  {}  {}", user.id, user.acronym, user.name.unwrap_or_default());
        return Ok(());
    }

    let renderer = Renderer::new(settings_service.data_dir(&settings), &settings.rendering);
    let mut service =
        ContentService::new(repo, renderer).with_entry_limit(settings.listing.entry_limit);

    match (command, rest) {
        ("filters", []) => {
            for kind in FilterKind::supported() {
                println!("{:<12} {}", kind.as_str(), kind.description());
            }
        }
        ("list", rest) => {
            let criteria = rest.first().map(ListCriteria::of_type);
            for content in service.list_all(criteria.as_ref()).await.unwrap_or_default() {
                println!(
                    "{:>5}  {:<10} {:<24} {}",
                    content.id.unwrap_or_default(),
                    content.content_type,
                    content.key,
                    content.title
                );
            }
        }
        ("entries", rest) => {
            let options = EntryOptions {
                content_type: rest.first().cloned(),
                order_order: Some("DESC".to_string()),
                ..EntryOptions::default()
            };
            for entry in service.get_entries(&options).await? {
                let entry = entry?;
                println!("<article>\n<h1>{}</h1>", entry.title);
                println!("{}\n</article>", entry.rendered.unwrap_or_default());
            }
        }
        ("show", [target]) => {
            let mut content = match target.parse::<i64>() {
                Ok(id) => service.load_by_id(id).await,
                Err(_) => service.load_by_key(target).await,
            };
            if let Ok(content) = content.as_mut() {
                service.prepare(content)?;
                let toc = content.toc.as_ref().filter(|toc| !toc.is_empty());
                if let Some(toc) = toc {
                    print!("{}", toc.formatted);
                }
                println!("{}", content.rendered.as_deref().unwrap_or_default());
            }
        }
        _ => bail!(USAGE),
    }

    for notice in service.take_notices() {
        eprintln!("[{:?}] {}", notice.level, notice.message);
    }

    Ok(())
}
