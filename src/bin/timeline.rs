//! A command-line front end to a timeline
//!
//! Memories are stored in a local folder, and in Firestore when `FIRESTORE_PROJECT` is set
//! (`FIRESTORE_TOKEN` and `FIRESTORE_ENDPOINT` are optional).

use std::path::PathBuf;

use chrono::NaiveDate;

use timeline_keeper::firestore::FirestoreClient;
use timeline_keeper::storage::FileStore;
use timeline_keeper::view::ConsoleView;
use timeline_keeper::{EventDraft, EventId, FirestoreGateway, Timeline, DATE_FORMAT};

const USAGE: &str = "Usage: timeline [--folder <path>] [list | all | year <year> | add <date> <title> [description] | delete <id>]";


fn remote_from_env() -> Option<FirestoreClient> {
    let project = std::env::var("FIRESTORE_PROJECT").ok()?;
    let token = std::env::var("FIRESTORE_TOKEN").ok();
    let client = match std::env::var("FIRESTORE_ENDPOINT") {
        Ok(endpoint) => FirestoreClient::new_with_endpoint(endpoint, project, timeline_keeper::firestore::DEFAULT_DATABASE, token),
        Err(_) => FirestoreClient::new(project, token),
    };
    match client {
        Ok(client) => Some(client),
        Err(err) => {
            log::warn!("Invalid Firestore configuration: {}. Using the local store only", err);
            None
        },
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let mut folder = FileStore::default_folder();
    if args.first().map(String::as_str) == Some("--folder") {
        if args.len() < 2 {
            eprintln!("{}", USAGE);
            std::process::exit(1);
        }
        folder = PathBuf::from(args.remove(1));
        args.remove(0);
    }

    let gateway = FirestoreGateway::select(remote_from_env(), FileStore::new(&folder));
    let show_all_years = args.first().map(String::as_str) == Some("all");
    let mut timeline = Timeline::new(gateway, ConsoleView { show_all_years });
    timeline.initialize().await;

    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        [] | ["list"] | ["all"] => (),
        ["year", year] => match year.parse::<i32>() {
            Ok(year) => timeline.show_year(year),
            Err(err) => {
                eprintln!("Invalid year {:?}: {}", year, err);
                std::process::exit(1);
            },
        },
        ["add", date, title, rest @ ..] => {
            let date = match NaiveDate::parse_from_str(date, DATE_FORMAT) {
                Ok(date) => date,
                Err(err) => {
                    eprintln!("Invalid date {:?} (expected YYYY-MM-DD): {}", date, err);
                    std::process::exit(1);
                },
            };
            let draft = EventDraft {
                date: Some(date),
                title: Some(title.to_string()),
                description: rest.first().map(|d| d.to_string()),
                photo: None,
            };
            if let Some(id) = timeline.add_event(draft).await {
                println!("Added {}", id);
            }
        },
        ["delete", id] => {
            timeline.delete_event(&EventId::from(*id)).await;
        },
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(1);
        },
    }
}
