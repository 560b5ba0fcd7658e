// UI layer: renders the status header and numbered menu, reads one line
// of input and dispatches to the HTTP or realtime wrapper. The functions
// are small and synchronous to make the flow easy to follow.

use crate::api::ApiClient;
use crate::config::Config;
use crate::notification::field_or_na;
use crate::realtime::RealtimeClient;
use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::stdout;

/// Main interactive menu. Receives the API client and the realtime
/// connection handle and runs a read-dispatch loop until the user picks
/// the quit option. Ctrl-C surfaces as an input error and is handled by
/// the caller, which still performs the best-effort disconnect.
pub fn main_menu(config: &Config, api: &ApiClient, realtime: &mut RealtimeClient) -> Result<()> {
    loop {
        draw_menu(config, realtime)?;
        let choice: String = Input::new().with_prompt("Select an option").interact_text()?;
        match choice.trim() {
            "1" => {
                realtime.connect(&config.ws_url(), config.token.as_deref());
            }
            "2" => realtime.disconnect(),
            "3" => send_preset(api, "Bienvenue", "Vous êtes connecté!", "welcome"),
            "4" => send_preset(api, "Maintenance", "Maintenance prévue à 22h00", "maintenance"),
            "5" => send_preset(api, "Erreur", "Une erreur s'est produite", "error"),
            "6" => handle_custom_send(realtime)?,
            "7" => {
                let spinner = spinner("Checking server health...");
                api.check_health();
                spinner.finish_and_clear();
            }
            "8" => show_received(realtime),
            "9" => {
                realtime.clear_received();
                println!("✅ Notifications cleared");
            }
            "0" => {
                println!("Goodbye!");
                break;
            }
            other => println!("❌ Invalid option: {}", other),
        }
        pause()?;
    }
    Ok(())
}

/// Clear the screen and render the banner, status header and menu.
fn draw_menu(config: &Config, realtime: &RealtimeClient) -> Result<()> {
    execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║              WebSocket Notification Tester                 ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
    println!("🔗 Backend URL: {}", config.base_url);
    println!("👤 User ID: {}", config.user_id);
    println!(
        "📡 Connected: {}",
        if realtime.is_connected() { "✅ yes" } else { "❌ no" }
    );
    println!("📬 Notifications received: {}", realtime.received_count());
    println!();
    println!("{}", "=".repeat(60));
    println!("1. Connect to the server");
    println!("2. Disconnect");
    println!("3. Send 'Bienvenue' notification (HTTP)");
    println!("4. Send 'Maintenance' notification (HTTP)");
    println!("5. Send 'Erreur' notification (HTTP)");
    println!("6. Send a custom notification (websocket)");
    println!("7. Check server health");
    println!("8. Show received notifications");
    println!("9. Clear received notifications");
    println!("0. Quit");
    println!("{}", "=".repeat(60));
    Ok(())
}

/// One preset notification through the HTTP wrapper.
fn send_preset(api: &ApiClient, titre: &str, message: &str, kind: &str) {
    let spinner = spinner("Sending...");
    api.send_notification(titre, message, kind);
    spinner.finish_and_clear();
}

/// Collect the three fields and emit them over the websocket channel.
fn handle_custom_send(realtime: &RealtimeClient) -> Result<()> {
    let titre: String = Input::new().with_prompt("Title").interact_text()?;
    let message: String = Input::new().with_prompt("Message").interact_text()?;
    let kind: String = Input::new().with_prompt("Type").interact_text()?;
    realtime.send(&titre, &message, &kind);
    Ok(())
}

/// Render the received-notification log, oldest first, with placeholders
/// for any field a payload does not carry.
fn show_received(realtime: &RealtimeClient) {
    let received = realtime.received();
    if received.is_empty() {
        println!("\n❌ No notifications received");
        return;
    }
    println!("\n📬 Received notifications:");
    for (i, notif) in received.iter().enumerate() {
        println!("\n  {}. Title: {}", i + 1, field_or_na(notif, "titre"));
        println!("     Message: {}", field_or_na(notif, "message"));
        println!("     Type: {}", field_or_na(notif, "type"));
    }
}

/// Block until the user acknowledges with Enter before redrawing.
fn pause() -> Result<()> {
    let _: String = Input::new()
        .with_prompt("Press Enter to continue")
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}

fn spinner(msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    bar.set_message(msg.to_string());
    bar
}
