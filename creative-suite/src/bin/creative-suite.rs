//! Line-oriented terminal host for the creative suite.

use std::path::PathBuf;

use creative_suite::poster::PosterCategory;
use creative_suite::upload::ImageUploader;
use creative_suite::view::{
    HomeCard, DISCLAIMER, HEADLINE, HOME_CARDS, HOW_TO_STEPS, LOCK_MESSAGE, LOCK_TITLE,
    PHOTO_TIPS,
};
use creative_suite::{
    AppConfig, Error, FileStore, GeminiImageGenerator, Orchestrator, Result, Screen, Tool,
    TrialGate, ViewController,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

type Controller = ViewController<GeminiImageGenerator, FileStore>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().inspect_err(|err| {
        tracing::error!(error = %err, "startup failed");
    })?;
    let generator = GeminiImageGenerator::with_model(&config.client, config.model.clone());
    let gate = TrialGate::load(FileStore::new(&config.state_path))?;
    tracing::info!(
        model = %config.model,
        state = %config.state_path.display(),
        timeout_secs = ?config.client.config().http_options.timeout,
        "creative suite ready"
    );
    let mut view = ViewController::new(Orchestrator::new(generator), gate);

    render(&view);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "quit" || line == "exit" {
            break;
        }
        if let Err(err) = handle(&mut view, line).await {
            tracing::debug!(error = %err, category = ?err.category(), "command failed");
            report(line.split_whitespace().next().unwrap_or(""), &err);
        }
        render(&view);
    }
    Ok(())
}

async fn handle(view: &mut Controller, line: &str) -> Result<()> {
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(command, rest)| (command, rest.trim()));

    if view.is_locked() && command != "home" {
        if !line.is_empty() {
            view.unlock(line)?;
        }
        return Ok(());
    }

    match (view.screen(), command) {
        (_, "") => Ok(()),
        (_, "home") => {
            view.go_home();
            Ok(())
        }
        (Screen::Home, "poster" | "1") => {
            view.select_tool(Tool::Poster);
            Ok(())
        }
        (Screen::Home, "child" | "2") => {
            view.select_tool(Tool::Child);
            Ok(())
        }
        (Screen::Child, "father") => {
            view.child_mut()?.upload_father(rest).await;
            Ok(())
        }
        (Screen::Child, "mother") => {
            view.child_mut()?.upload_mother(rest).await;
            Ok(())
        }
        (Screen::Poster, "logo") => {
            view.poster_mut()?.upload_logo(rest).await;
            Ok(())
        }
        (Screen::Poster, "extra") => {
            view.poster_mut()?.upload_extra_image(rest).await;
            Ok(())
        }
        (Screen::Poster, "category") => {
            let category = rest.parse::<PosterCategory>()?;
            view.poster_mut()?.form_mut().category = category;
            Ok(())
        }
        (Screen::Poster, field) if poster_field(field).is_some() => {
            let form = view.poster_mut()?.form_mut();
            let value = rest.to_string();
            match poster_field(field) {
                Some(PosterField::Organization) => form.organization_name = value,
                Some(PosterField::Topic) => form.topic = value,
                Some(PosterField::Subtopic) => form.subtopic = value,
                Some(PosterField::Description) => form.description = value,
                Some(PosterField::Achievements) => form.achievements = value,
                Some(PosterField::Director) => form.director_name = value,
                Some(PosterField::Team) => form.team_members = value,
                None => {}
            }
            Ok(())
        }
        (Screen::Child | Screen::Poster, "generate") => {
            println!("Generating... this can take up to a minute.");
            view.generate().await
        }
        (Screen::Child | Screen::Poster, "download") => {
            let mut args = rest.split_whitespace();
            let index = args
                .next()
                .unwrap_or("1")
                .parse::<usize>()
                .map_err(|_| Error::Parse {
                    message: format!("not an image number: {rest}"),
                })?;
            let dest = args.next().map_or_else(|| PathBuf::from("."), PathBuf::from);
            let path = view.download(index, dest).await?;
            println!("Saved {}", path.display());
            Ok(())
        }
        (_, other) => Err(Error::Parse {
            message: format!("unknown command: {other}"),
        }),
    }
}

#[derive(Clone, Copy)]
enum PosterField {
    Organization,
    Topic,
    Subtopic,
    Description,
    Achievements,
    Director,
    Team,
}

fn poster_field(command: &str) -> Option<PosterField> {
    Some(match command {
        "org" => PosterField::Organization,
        "topic" => PosterField::Topic,
        "subtopic" => PosterField::Subtopic,
        "description" => PosterField::Description,
        "achievements" => PosterField::Achievements,
        "director" => PosterField::Director,
        "team" => PosterField::Team,
        _ => return None,
    })
}

fn report(command: &str, err: &Error) {
    // Unlock and generation failures are already shown by the screen.
    if matches!(err, Error::IncorrectPassword) || command == "generate" {
        return;
    }
    println!("! {err}");
}

fn render(view: &Controller) {
    println!();
    println!("== {HEADLINE} ==");
    println!("{}", view.subtitle());

    if view.is_locked() {
        println!();
        println!("{LOCK_TITLE}");
        println!("{LOCK_MESSAGE}");
        if let Some(message) = view.unlock_error() {
            println!("! {message}");
        }
        println!("password> ");
        return;
    }

    match view.screen() {
        Screen::Home => {
            for (i, HomeCard { title, description, .. }) in HOME_CARDS.iter().enumerate() {
                println!("  [{}] {title}: {description}", i + 1);
            }
            println!("commands: poster | child | quit");
        }
        Screen::Child => {
            let Some(tool) = view.child() else { return };
            for slot in [&tool.father, &tool.mother] {
                println!("  {}: {}", slot.title(), slot_status(slot));
            }
            if tool.results().is_empty() {
                println!("  How to use:");
                for (i, step) in HOW_TO_STEPS.iter().enumerate() {
                    println!("  {}. {step}", i + 1);
                }
                println!("  Photo tips:");
                for tip in PHOTO_TIPS {
                    println!("  - {tip}");
                }
                println!("  {DISCLAIMER}");
            }
            for image in tool.results() {
                println!("  [{}] {}", image.index, image.file_name());
            }
            if let Some(message) = tool.error() {
                println!("! {message}");
            }
            println!("commands: father <path> | mother <path> | generate | download <n> [dir] | home");
        }
        Screen::Poster => {
            let Some(tool) = view.poster() else { return };
            let form = tool.form();
            println!("  category: {} ({})", form.category, category_list());
            for (label, value) in [
                ("org*", &form.organization_name),
                ("topic*", &form.topic),
                ("subtopic", &form.subtopic),
                ("description*", &form.description),
                ("achievements", &form.achievements),
                ("director", &form.director_name),
                ("team", &form.team_members),
            ] {
                println!("  {label}: {value}");
            }
            for slot in [&tool.logo, &tool.extra] {
                println!("  {}: {}", slot.title(), slot_status(slot));
            }
            if let Some(image) = tool.result() {
                println!("  [{}] {}", image.index, image.file_name());
            }
            if let Some(message) = tool.error() {
                println!("! {message}");
            }
            println!("commands: category <name> | org/topic/subtopic/description/achievements/director/team <text> | logo <path> | extra <path> | generate | download 1 [dir] | home");
        }
    }
}

fn slot_status(slot: &ImageUploader) -> String {
    match (slot.preview(), slot.error()) {
        (_, Some(message)) => format!("! {message}"),
        (Some(image), None) => format!("{} ({} bytes)", image.mime_type, image.size()),
        (None, None) => "(none)".to_string(),
    }
}

fn category_list() -> String {
    PosterCategory::ALL
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
