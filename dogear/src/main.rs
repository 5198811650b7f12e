use dogear::config::Config;
use dogear::model::{Bookmark, BookmarkId};
use dogear::realtime::RealtimeChannel;
use dogear::submit::{submit_create, submit_delete};
use dogear::supabase::{self, SupabaseStore};
use parallax::{ChangeEvent, LiveView, Subscription, accept};
use tokio::io::AsyncBufReadExt;

fn print_list(entries: &im::Vector<Bookmark>) {
    if entries.is_empty() {
        println!("No bookmarks yet.");
        return;
    }
    println!(
        "{} bookmark{}:",
        entries.len(),
        if entries.len() == 1 { "" } else { "s" }
    );
    for bookmark in entries {
        println!(
            "  {}  {} — {}  ({})",
            bookmark.created_at.format("%b %-d, %Y"),
            bookmark.title,
            bookmark.hostname(),
            bookmark.id,
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  add <url> <title...>   save a bookmark");
    println!("  rm <id>                delete a bookmark");
    println!("  ls                     list bookmarks");
    println!("  quit                   exit");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let session = supabase::sign_in(&config).await?;
    println!("Signed in as {}", session.owner());

    let store = SupabaseStore::new(&config, &session);

    let mut view = LiveView::new();
    // Reprint whenever the view actually changes, whatever the source of the
    // change was - a local command or another session's event.
    view.on_change(print_list);
    view.seed(store.list(session.owner()).await?);
    if view.is_empty() {
        println!("No bookmarks yet.");
    }

    let channel = RealtimeChannel::new(&config);
    let mut subscription = Subscription::open(channel, &session).await?;
    println!("Live. Changes from your other sessions will appear here.");
    print_help();

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = subscription.next_event() => {
                let Some(event) = event else {
                    eprintln!("Realtime stream ended; changes from other sessions will no longer appear.");
                    break;
                };
                if !accept(&event, session.owner()) {
                    continue;
                }
                match event {
                    ChangeEvent::Insert(bookmark) => {
                        view.apply_insert(bookmark);
                    }
                    ChangeEvent::Delete { id, .. } => {
                        view.apply_delete(&id);
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let mut words = line.split_whitespace();
                match words.next() {
                    Some("add") => {
                        let url = words.next().unwrap_or("");
                        let title = words.collect::<Vec<_>>().join(" ");
                        match submit_create(&store, &session, &mut view, &title, url).await {
                            Ok(bookmark) => println!("Saved {}", bookmark.title),
                            Err(e) => eprintln!("{e}"),
                        }
                    }
                    Some("rm") => {
                        let raw = words.next().unwrap_or("");
                        match raw.parse::<uuid::Uuid>() {
                            Ok(id) => {
                                if let Err(e) =
                                    submit_delete(&store, &session, &mut view, BookmarkId(id)).await
                                {
                                    eprintln!("{e}");
                                }
                            }
                            Err(_) => eprintln!("rm needs a bookmark id (see ls)"),
                        }
                    }
                    Some("ls") => print_list(&view.snapshot()),
                    Some("quit") | Some("exit") => break,
                    Some(_) => print_help(),
                    None => {}
                }
            }
        }
    }

    subscription.close();
    Ok(())
}
