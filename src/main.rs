use clap::Parser;
use diarist::application::{delete_entry, find_entry, list_entries, save_entry, search_entries};
use diarist::cli::{format_entry_detail, format_entry_list, Cli, Commands};
use diarist::domain::{parse_tag_input, Entry, SearchCriteria};
use diarist::error::DiaryError;
use diarist::infrastructure::{Config, FileSystemStore};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = run(cli);

    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("diarist=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), DiaryError> {
    let cwd = std::env::current_dir()?;
    let config = Config::resolve(&cwd, cli.dir)?;
    let store = FileSystemStore::open(&config)?;

    match cli.command {
        Commands::New {
            title,
            content,
            mood,
            tags,
        } => {
            let mut entry = Entry::new(title, content);
            entry.set_mood(mood);
            if let Some(tags) = tags {
                entry.set_tags(parse_tag_input(&tags));
            }

            let path = save_entry(&store, &mut entry)?;
            println!("Saved {} to {}", entry.id(), path.display());
            Ok(())
        }
        Commands::Edit {
            id,
            title,
            content,
            mood,
            tags,
        } => {
            let mut entry = find_entry(&store, &id)?;
            if let Some(title) = title {
                entry.set_title(title);
            }
            if let Some(content) = content {
                entry.set_content(content);
            }
            if let Some(mood) = mood {
                entry.set_mood(Some(mood));
            }
            if let Some(tags) = tags {
                entry.set_tags(parse_tag_input(&tags));
            }

            let path = save_entry(&store, &mut entry)?;
            println!("Saved {} to {}", entry.id(), path.display());
            Ok(())
        }
        Commands::List { limit } => {
            let entries = list_entries(&store, limit)?;
            print!("{}", format_entry_list(&entries));
            Ok(())
        }
        Commands::Search { query, mood, date } => {
            let criteria = SearchCriteria { query, mood, date };
            let entries = search_entries(&store, &criteria)?;
            print!("{}", format_entry_list(&entries));
            Ok(())
        }
        Commands::Show { id } => {
            let entry = find_entry(&store, &id)?;
            print!("{}", format_entry_detail(&entry));
            Ok(())
        }
        Commands::Delete { id } => {
            delete_entry(&store, &id)?;
            println!("Deleted {}", id);
            Ok(())
        }
    }
}
