use anyhow::Result;
use d2reader_core::offset::{BuildLayout, GameModule};
use serde::Serialize;

#[derive(Serialize)]
struct BuildSummary {
    build: &'static str,
    requires: Vec<&'static str>,
    pause_flag: bool,
    hovered_item: bool,
    string_tables: bool,
}

impl From<&BuildLayout> for BuildSummary {
    fn from(layout: &BuildLayout) -> Self {
        Self {
            build: layout.build,
            requires: layout.requires.iter().map(GameModule::file_name).collect(),
            pause_flag: layout.pause_menu.is_some(),
            hovered_item: layout.hovered_item.is_some(),
            string_tables: layout.strings.is_some(),
        }
    }
}

/// List the builds with a known layout
pub fn run(json: bool) -> Result<()> {
    let builds: Vec<BuildSummary> =
        d2reader_core::offset::KNOWN_BUILDS.iter().map(BuildSummary::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&builds)?);
        return Ok(());
    }

    println!("{:<8} {:<6} {:<8} {:<8} modules", "build", "pause", "hovered", "strings");
    for build in &builds {
        let yes_no = |b: bool| if b { "yes" } else { "-" };
        let modules = if build.requires.is_empty() {
            "Game.exe".to_string()
        } else {
            build.requires.join(", ")
        };
        println!(
            "{:<8} {:<6} {:<8} {:<8} {}",
            build.build,
            yes_no(build.pause_flag),
            yes_no(build.hovered_item),
            yes_no(build.string_tables),
            modules
        );
    }
    Ok(())
}
