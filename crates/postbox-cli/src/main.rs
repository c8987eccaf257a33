//! Postbox simulator binary.
//!
//! Runs the letterbox controller loop against mock devices, driven from a
//! stdin command prompt. Useful for exercising the access flows without a
//! Raspberry Pi on the desk.
//!
//! # Usage
//!
//! ```bash
//! postbox --pin 1234 --tag 909938959676
//! ```
//!
//! REPL commands:
//!
//! - a single keypad character (`0`-`9`, `*`, `#`, `A`-`D`) taps that key
//! - `tag <hex-uid>` presents a tag, e.g. `tag 01020304`
//! - `mail <cm>` sets the distance reading; `mail none` simulates a missed
//!   echo
//! - `show` prints the display panel
//! - `quit` shuts the controller down

use anyhow::Context;
use clap::Parser;
use postbox_controller::{AccessController, ControllerConfig, Driver};
use postbox_core::{AccessCode, TagIdentity};
use postbox_hardware::Key;
use postbox_hardware::devices::{
    AnyDisplayDevice, AnyDistanceSensorDevice, AnyIndicatorDevice, AnyKeypadDevice, AnyLockDevice,
    AnyNotifierDevice, AnyTagReaderDevice,
};
use postbox_hardware::mock::{
    MockDisplay, MockDisplayHandle, MockDistanceSensor, MockDistanceSensorHandle, MockIndicator,
    MockIndicatorHandle, MockKeypad, MockKeypadHandle, MockLock, MockNotifier, MockTagReader,
    MockTagReaderHandle,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Smart letterbox controller (simulator)
#[derive(Parser, Debug)]
#[command(name = "postbox")]
#[command(about = "Smart letterbox access controller, wired to mock devices")]
#[command(version)]
struct Args {
    /// Startup PIN code (4 digits)
    #[arg(long, default_value = "1234")]
    pin: String,

    /// Authorized tag identity (decimal UID rendering)
    #[arg(long, default_value = "909938959676")]
    tag: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

struct Handles {
    keypad: MockKeypadHandle,
    sensor: MockDistanceSensorHandle,
    tags: MockTagReaderHandle,
    display: MockDisplayHandle,
    indicator: MockIndicatorHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let default_pin: AccessCode = args.pin.parse().context("invalid --pin")?;
    let authorized_tag: TagIdentity = args.tag.parse().context("invalid --tag")?;

    let config = ControllerConfig {
        default_pin,
        authorized_tag,
        ..Default::default()
    };

    let (display, display_handle) = MockDisplay::new();
    let (lock, _lock_handle) = MockLock::new();
    let (tags, tag_handle) = MockTagReader::new();
    let (notifier, _notifier_handle) = MockNotifier::new();
    let (indicator, indicator_handle) = MockIndicator::new();
    let (keypad, keypad_handle) = MockKeypad::new();
    let (sensor, sensor_handle) = MockDistanceSensor::new();

    let controller = AccessController::new(
        AnyDisplayDevice::Mock(display),
        AnyLockDevice::Mock(lock),
        AnyTagReaderDevice::Mock(tags),
        AnyNotifierDevice::Mock(notifier),
        AnyIndicatorDevice::Mock(indicator),
        config,
    );
    let driver = Driver::new(
        AnyKeypadDevice::Mock(keypad),
        AnyDistanceSensorDevice::Mock(sensor),
        controller,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let driver_task = tokio::spawn(driver.run(shutdown_rx));

    // Ctrl-C is the power interrupt: unconditional shutdown
    let interrupt_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("power interrupt");
            let _ = interrupt_tx.send(true);
        }
    });

    let handles = Handles {
        keypad: keypad_handle,
        sensor: sensor_handle,
        tags: tag_handle,
        display: display_handle,
        indicator: indicator_handle,
    };

    println!("postbox simulator; type `help` for commands");
    repl(&handles, &shutdown_tx).await?;

    let _ = shutdown_tx.send(true);
    driver_task.await.context("driver task failed")?;
    print_panel(&handles);
    Ok(())
}

async fn repl(handles: &Handles, shutdown: &watch::Sender<bool>) -> anyhow::Result<()> {
    let mut shutdown_watch = shutdown.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = shutdown_watch.changed() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !dispatch(line.trim(), handles).await? {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Handle one REPL command; returns `false` on `quit`.
async fn dispatch(command: &str, handles: &Handles) -> anyhow::Result<bool> {
    match command {
        "" => {}
        "help" => print_help(),
        "quit" | "exit" => return Ok(false),
        "show" => print_panel(handles),
        _ if command.len() == 1 => {
            if let Some(c) = command.chars().next() {
                match Key::from_char(c.to_ascii_uppercase()) {
                    Ok(key) => {
                        tap(&handles.keypad, key).await;
                        print_panel(handles);
                    }
                    Err(err) => println!("unknown key: {err}"),
                }
            }
        }
        _ if command.starts_with("tag ") => {
            match parse_uid(command.trim_start_matches("tag ").trim()) {
                Ok(uid) => {
                    if let Err(err) = handles.tags.present_tag(uid).await {
                        println!("tag rejected: {err}");
                    }
                    // Give the blocked read a moment to consume it
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    print_panel(handles);
                }
                Err(err) => println!("bad uid: {err}"),
            }
        }
        _ if command.starts_with("mail ") => {
            let value = command.trim_start_matches("mail ").trim();
            if value == "none" {
                handles.sensor.set_echo_timeout();
                println!("echo timeout set");
            } else {
                match value.parse::<f32>() {
                    Ok(cm) => {
                        handles.sensor.set_distance_cm(cm);
                        println!("distance set to {cm} cm");
                    }
                    Err(_) => println!("bad distance: {value}"),
                }
            }
        }
        other => println!("unknown command: {other} (try `help`)"),
    }
    Ok(true)
}

/// Press and release a key, long enough for the 20 ms poll loop to see
/// both levels.
async fn tap(keypad: &MockKeypadHandle, key: Key) {
    keypad.press(key);
    tokio::time::sleep(Duration::from_millis(80)).await;
    keypad.release();
    tokio::time::sleep(Duration::from_millis(200)).await;
}

/// Parse a hex string ("01020304") into UID bytes.
fn parse_uid(hex: &str) -> anyhow::Result<Vec<u8>> {
    if hex.is_empty() || hex.len() % 2 != 0 {
        anyhow::bail!("expected an even number of hex digits");
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).context("invalid hex digit"))
        .collect()
}

fn print_panel(handles: &Handles) {
    let led = if handles.indicator.is_on() { "● mail" } else { "○" };
    println!("+----------------+");
    println!("|{:<16}|", handles.display.line(0));
    println!("|{:<16}|", handles.display.line(1));
    println!("+----------------+  {led}");
}

fn print_help() {
    println!("commands:");
    println!("  0-9 * # A-D   tap that keypad key");
    println!("  tag <hex>     present a tag, e.g. `tag 01020304`");
    println!("  mail <cm>     set the distance reading");
    println!("  mail none     simulate a missed echo");
    println!("  show          print the display panel");
    println!("  quit          shut down");
}
