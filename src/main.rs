use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context};
use pane_layout::config::{Config, DividerConfig};
use pane_layout::pane::interaction::{InteractionEffect, PaneInteraction};
use pane_layout::{ContentId, FocusDirection, LayoutStore, PaneId, Rect, SessionId, SplitDirection};

/// Session driven by the command loop.
const SESSION: &str = "main";

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|a| a == "--print-default-config") {
        print!("{}", Config::default_toml());
        return Ok(());
    }

    env_logger::init();

    let config_path = dirs_config_path();
    let config = match Config::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("Config load error ({e}), using defaults");
            Config::default()
        }
    };

    let mut store: LayoutStore = LayoutStore::with_config(config.layout);
    let session = SessionId::from(SESSION);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("reading command")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match run_command(&mut store, &config.divider, &session, line) {
            Ok(Some(output)) => writeln!(stdout, "{output}")?,
            Ok(None) => {}
            Err(e) => writeln!(stdout, "error: {e}")?,
        }
    }
    Ok(())
}

/// Apply one command line to the store, returning text to print.
///
/// Commands: `init <content>`, `split h|v <content>`, `close`,
/// `focus up|down|left|right`, `ratio <split-id> <ratio>`, `rects <w> <h>`,
/// `drag <w> <h> <x0> <y0> <x1> <y1>`, `show`.
fn run_command(
    store: &mut LayoutStore,
    divider: &DividerConfig,
    session: &SessionId,
    line: &str,
) -> anyhow::Result<Option<String>> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    match (command, args.as_slice()) {
        ("init", [content]) => match store.initialize_layout(session, ContentId::from(*content)) {
            Some(id) => Ok(Some(format!("created {id}"))),
            None => bail!("session already has a layout"),
        },
        ("split", [dir, content]) => {
            let direction = match *dir {
                "h" => SplitDirection::Horizontal,
                "v" => SplitDirection::Vertical,
                other => bail!("unknown split direction {other:?}"),
            };
            let focused = focused(store, session)?;
            let id = store.split_pane(session, focused, direction, ContentId::from(*content))?;
            Ok(Some(format!("created {id}")))
        }
        ("close", []) => {
            let focused = focused(store, session)?;
            let closed = store
                .close_pane(session, focused)
                .ok_or_else(|| anyhow!("{focused} could not be closed"))?;
            Ok(Some(format!("closed {}", closed.removed_content_id)))
        }
        ("focus", [dir]) => {
            let direction = match *dir {
                "up" => FocusDirection::Up,
                "down" => FocusDirection::Down,
                "left" => FocusDirection::Left,
                "right" => FocusDirection::Right,
                other => bail!("unknown focus direction {other:?}"),
            };
            Ok(store.move_focus(session, direction).map(|id| format!("focused {id}")))
        }
        ("ratio", [split, ratio]) => {
            let split_id = PaneId(split.trim_start_matches("pane-").parse().context("split id")?);
            let ratio: f32 = ratio.parse().context("ratio")?;
            store.update_split_ratio(session, split_id, ratio);
            Ok(None)
        }
        ("rects", [width, height]) => {
            let bounds = Rect::new(0.0, 0.0, width.parse()?, height.parse()?);
            let rects = store.pane_rects(session, bounds);
            Ok(Some(serde_json::to_string(&rects)?))
        }
        ("drag", [width, height, x0, y0, x1, y1]) => {
            let bounds = Rect::new(0.0, 0.0, width.parse()?, height.parse()?);
            drag_divider(store, divider, session, bounds, (x0.parse()?, y0.parse()?), (x1.parse()?, y1.parse()?))
                .map(Some)
        }
        ("show", []) => {
            let snapshot = serde_json::json!({
                "layout": store.layout(session),
                "focused": store.focused_pane(session),
            });
            Ok(Some(serde_json::to_string_pretty(&snapshot)?))
        }
        _ => bail!("unrecognized command {line:?}"),
    }
}

/// Press on the divider under `from`, move to `to` and release.
fn drag_divider(
    store: &mut LayoutStore,
    divider: &DividerConfig,
    session: &SessionId,
    bounds: Rect,
    from: (f32, f32),
    to: (f32, f32),
) -> anyhow::Result<String> {
    let mut interaction = PaneInteraction::new(divider.clone());
    interaction.update_layout(store.layout(session).map(|t| t.as_ref()), bounds);
    interaction.on_cursor_moved(from.0, from.1);
    interaction.on_mouse_press();

    let effect = interaction.on_cursor_moved(to.0, to.1);
    interaction.on_mouse_release();
    let InteractionEffect::UpdateRatio { split_id, ratio } = effect else {
        bail!("no divider at ({}, {})", from.0, from.1);
    };
    store.update_split_ratio(session, split_id, ratio);
    Ok(format!("resized {split_id} to {ratio}"))
}

fn focused(store: &LayoutStore, session: &SessionId) -> anyhow::Result<PaneId> {
    store
        .focused_pane(session)
        .ok_or_else(|| anyhow!("session {session} has no layout"))
}

/// Get the config file path (~/.config/pane-layout/layout.toml).
fn dirs_config_path() -> std::path::PathBuf {
    dirs_home()
        .join(".config")
        .join("pane-layout")
        .join("layout.toml")
}

/// Get the user's home directory.
fn dirs_home() -> std::path::PathBuf {
    std::env::var("HOME")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
}
