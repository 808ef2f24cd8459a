use futures::future::join_all;
use rgenstudio::{
    logger::{self, LogLevel, LoggerConfig},
    utils::{format_duration, format_track_title, validate_prompt, validate_style, validate_task_id},
    ApiError, CancelHandle, CancelSignal, CustomMusicRequest, GenerationResponse, ImageClient,
    LyricsRequest, MusicGenerationRequest, SunoClient, TextToImageRequest,
};
use serde::Serialize;
use std::env;
use std::process;

type DemoResult = Result<(), Box<dyn std::error::Error>>;

const USAGE: &str = "\
usage: rgenstudio <command> [args]

  music <prompt> [style]        generate a track from a prompt
  custom <title> <lyrics> [style]
  status <task-id>...           poll one or more generation tasks
  lyrics <prompt>
  account                       show remaining credits
  image <prompt>                generate an image
  styles                        list image style presets

environment: SUNO_API_KEY, SUNO_API_URL, SUNO_TIMEOUT_MS,
             IMAGE_API_KEY, IMAGE_API_URL, IMAGE_TIMEOUT_MS, RGENSTUDIO_LOG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let level = env::var("RGENSTUDIO_LOG")
        .ok()
        .and_then(|name| LogLevel::parse(&name))
        .unwrap_or(LogLevel::Info);
    logger::init_with_config(LoggerConfig::development().with_level(level))?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let (handle, signal) = CancelHandle::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("🛑 Interrupted, cancelling in-flight requests");
            handle.cancel();
        }
    });

    let outcome = match command.as_str() {
        "music" | "custom" | "status" | "lyrics" | "account" => {
            run_music(command, rest, signal).await
        }
        "image" | "styles" => run_image(command, rest, signal).await,
        _ => {
            println!("{}", USAGE);
            Ok(())
        }
    };

    if let Err(e) = outcome {
        match e.downcast_ref::<ApiError>() {
            Some(api_error) => {
                log::error!("❌ {} failed: {}", command, api_error);
                print_json(&api_error.descriptor())?;
            }
            None => log::error!("❌ {}", e),
        }
        process::exit(1);
    }

    Ok(())
}

async fn run_music(command: &str, args: &[String], signal: CancelSignal) -> DemoResult {
    let client = SunoClient::from_env()?.with_cancel(signal);
    logger::log_client_info("Suno", client.transport());

    match (command, args) {
        ("music", [prompt, rest @ ..]) => {
            check_prompt(prompt)?;
            let mut request = MusicGenerationRequest::new(prompt.as_str());
            if let Some(style) = rest.first() {
                if !validate_style(style) {
                    return Err("style must be 2-100 characters".into());
                }
                request = request.with_style(style.as_str());
            }

            let response = client.generate_music(&request).await?;
            report_generation(&response);
            print_json(&response)
        }
        ("custom", [title, lyrics, rest @ ..]) => {
            let request = CustomMusicRequest {
                title: title.clone(),
                lyrics: lyrics.clone(),
                style: rest.first().cloned(),
                ..Default::default()
            };

            let response = client.generate_custom_music(&request).await?;
            report_generation(&response);
            print_json(&response)
        }
        ("status", task_ids) if !task_ids.is_empty() => {
            for task_id in task_ids.iter().filter(|id| !validate_task_id(id)) {
                log::warn!("Task id '{}' does not look like a UUID", task_id);
            }

            let polls = task_ids.iter().map(|id| client.get_generation_status(id));
            let mut failed = None;
            for (task_id, result) in task_ids.iter().zip(join_all(polls).await) {
                match result {
                    Ok(response) => {
                        log::info!("📊 Task {}", task_id);
                        report_generation(&response);
                        print_json(&response)?;
                    }
                    Err(e) => {
                        log::error!("❌ Task {}: {} ({})", task_id, e, e.code());
                        failed = Some(e);
                    }
                }
            }

            match failed {
                Some(e) => Err(e.into()),
                None => Ok(()),
            }
        }
        ("lyrics", [prompt, ..]) => {
            check_prompt(prompt)?;
            let request = LyricsRequest {
                prompt: prompt.clone(),
                callback_url: None,
            };
            print_json(&client.generate_lyrics(&request).await?)
        }
        ("account", _) => {
            let account = client.get_account_info().await?;
            log::info!(
                "💳 {} of {} credits remaining",
                account.remaining_credits,
                account.total_credits
            );
            print_json(&account)
        }
        _ => Err(USAGE.into()),
    }
}

async fn run_image(command: &str, args: &[String], signal: CancelSignal) -> DemoResult {
    let client = ImageClient::from_env()?.with_cancel(signal);
    logger::log_client_info("Image", client.transport());

    match (command, args) {
        ("image", [prompt, ..]) => {
            check_prompt(prompt)?;
            let response = client
                .generate_image(&TextToImageRequest::new(prompt.as_str()))
                .await?;
            log::info!("🖼️  Image ready: {}", response.image_url);
            print_json(&response)
        }
        ("styles", _) => print_json(&client.get_style_presets().await?),
        _ => Err(USAGE.into()),
    }
}

fn check_prompt(prompt: &str) -> DemoResult {
    if validate_prompt(prompt) {
        Ok(())
    } else {
        Err("prompt must be 3-500 characters".into())
    }
}

fn report_generation(response: &GenerationResponse) {
    if let Some(task_id) = &response.task_id {
        log::info!("🎵 Task id: {}", task_id);
    }
    for track in response.tracks() {
        log::info!(
            "  {} [{}] {:?}",
            format_track_title(track.title.as_deref().unwrap_or_default(), 50),
            format_duration(track.duration.unwrap_or_default()),
            track.state
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> DemoResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
