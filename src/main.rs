//! timbre-rs CLI entry point.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use timbre_rs::backend::{Backend, create_backend};
use timbre_rs::blob::UploadedFile;
use timbre_rs::capture::{CaptureConstraints, CaptureDevice, CpalDevice};
use timbre_rs::cli::{Args, TerminalView};
use timbre_rs::language::Language;
use timbre_rs::prefs::PreferenceStore;
use timbre_rs::recorder::{CloneController, View};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();
    log::debug!("CLI args: {:?}", args);

    args.validate()?;

    // Handle utility commands first
    if args.list_languages {
        list_languages();
        return Ok(());
    }

    let prefs = PreferenceStore::new()?;
    if args.toggle_theme {
        let theme = prefs.toggle_theme().context("Failed to save theme")?;
        println!("Theme set to {theme}.");
        return Ok(());
    }

    let theme = prefs.theme().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable preferences: {e}");
        Default::default()
    });

    let backend = create_backend(&args.server);
    let constraints = CaptureConstraints {
        sample_rate: args.sample_rate,
        ..Default::default()
    };
    let mut controller = CloneController::new(backend, CpalDevice::new(), TerminalView::new(theme))
        .with_constraints(constraints);
    controller.set_language(args.language);

    if args.record {
        record_sample(&mut controller, args.record_secs)?;

        if let Some(dir) = &args.save_recording {
            let path = controller
                .download(dir)
                .with_context(|| format!("Failed to save recording in {}", dir.display()))?;
            println!("Recording saved to: {}", path.display());
        }
    }

    if let Some(path) = &args.reference {
        let upload = UploadedFile::open(path)
            .with_context(|| format!("Failed to read reference audio: {}", path.display()))?
            .ok_or_else(|| anyhow!("Reference audio is empty: {}", path.display()))?;
        controller.attach_upload(upload)?;
    }

    let Some(text) = &args.text else {
        if !args.record {
            eprintln!("No action specified. Use -r or --record with -t to clone a voice.");
            eprintln!("Run with --help for usage information.");
        }
        return Ok(());
    };

    println!("Language: {}", controller.language());
    controller.set_text(text.clone());
    controller.submit().context("Voice cloning failed")?;

    if let Some(output) = &args.output {
        save_output(&controller, output)?;
    }

    Ok(())
}

fn list_languages() {
    println!("Supported languages:");
    for language in Language::ALL {
        println!("  {} ({})", language.name(), language.code());
    }
}

/// Record until Enter is pressed or the time limit passes.
fn record_sample<B: Backend, D: CaptureDevice, V: View>(
    controller: &mut CloneController<B, D, V>,
    limit: Option<u64>,
) -> Result<()> {
    controller.start().context("Could not start recording")?;

    let (tx, rx) = mpsc::channel::<()>();
    let _keep_open = match limit {
        Some(_) => Some(tx),
        None => {
            println!("Press Enter to stop recording.");
            thread::spawn(move || {
                let mut line = String::new();
                let _ = std::io::stdin().read_line(&mut line);
                let _ = tx.send(());
            });
            None
        }
    };

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                controller.tick();
                if let Some(limit) = limit
                    && controller.elapsed_secs().is_some_and(|secs| secs >= limit)
                {
                    break;
                }
            }
        }
    }

    controller.stop().context("Recording failed")?;
    Ok(())
}

fn save_output<B: Backend, D: CaptureDevice, V: View>(
    controller: &CloneController<B, D, V>,
    output: &Path,
) -> Result<()> {
    let audio_data = controller
        .fetch_result()
        .context("Failed to download synthesized audio")?;

    let mut file = fs::File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;

    file.write_all(&audio_data)
        .with_context(|| format!("Failed to write audio to: {}", output.display()))?;

    println!("Audio saved to: {}", output.display());
    println!("  Size: {} bytes", audio_data.len());

    Ok(())
}
