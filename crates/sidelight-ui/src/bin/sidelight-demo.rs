//! Scripted walkthrough against an in-memory host: create two groups,
//! trigger the triple-shift gesture, select by shortcut, and print the
//! style payload the host would receive.

use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use sidelight_store::storage::MemoryStorage;
use sidelight_ui::app::App;
use sidelight_ui::css::SelectorScheme;
use sidelight_ui::host::{Channel, HostPage, ReadinessWait};
use sidelight_ui::input::{Key, KeyEvent};

struct DemoHost {
    css: String,
}

impl HostPage for DemoHost {
    fn is_ready(&self) -> bool {
        true
    }

    fn workspace_id(&self) -> String {
        "T-demo".to_owned()
    }

    fn list_channels(&self) -> Vec<Channel> {
        ["general", "ops", "random", "incidents"]
            .iter()
            .enumerate()
            .map(|(index, name)| Channel {
                id: format!("C{index}"),
                name: (*name).to_owned(),
            })
            .collect()
    }

    fn apply_style_overrides(&mut self, css: &str) {
        self.css = css.to_owned();
    }
}

fn run() -> Result<(), String> {
    let host = Rc::new(RefCell::new(DemoHost { css: String::new() }));

    ReadinessWait::new(Duration::from_secs(5))
        .wait(&*host.borrow())
        .map_err(|err| err.to_string())?;

    let mut app = App::init(
        MemoryStorage::new(),
        Rc::clone(&host),
        SelectorScheme::sidebar_default(),
    )
    .map_err(|err| err.to_string())?;
    for note in app.startup_notes() {
        println!("{note}");
    }

    let mut form = app.open_group_creator();
    form.name = "oncall".to_owned();
    form.press_shortcut_key('o');
    form.set_channel_selected("C1", true);
    form.set_channel_selected("C3", true);
    let _created = app.submit_form(&form).map_err(|err| err.to_string())?;

    let mut form = app.open_group_creator();
    form.name = "social".to_owned();
    form.press_shortcut_key('s');
    form.set_channel_selected("C2", true);
    let _created = app.submit_form(&form).map_err(|err| err.to_string())?;

    for key in [Key::Shift, Key::Shift, Key::Shift, Key::Char('o')] {
        app.handle_key(KeyEvent::plain(key))
            .map_err(|err| err.to_string())?;
    }

    println!();
    println!("selection list:");
    for row in app.selection_view().rows {
        let marker = if row.is_selected { "x" } else { " " };
        let hint = row.shortcut_hint.unwrap_or_default();
        println!("  [{marker}] {} {hint}", row.name);
    }

    println!();
    println!("style overrides applied to the host:");
    println!("{}", host.borrow().css);
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sidelight-demo: {err}");
            ExitCode::FAILURE
        }
    }
}
