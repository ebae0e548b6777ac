use anyhow::Result;
use colored::Colorize;
use forecast_engine::{CharacterState, Forecast, ForecastConfig, Path};
use std::io::Write;

fn character_line(state: &CharacterState) -> String {
    format!(
        "lvl {} | xp {} | health {}/{} | gold {} | str {} dex {} vit {} int {} wis {} cha {}",
        state.level(),
        state.xp,
        state.health,
        state.max_health(),
        state.gold,
        state.stats.strength,
        state.stats.dexterity,
        state.stats.vitality,
        state.stats.intelligence,
        state.stats.wisdom,
        state.stats.charisma
    )
}

fn outcome(path: &Path) -> String {
    path.final_state().map_or_else(
        || "empty path".to_string(),
        |state| {
            format!(
                "health {}/{} xp {} gold {}",
                state.health,
                state.max_health(),
                state.xp,
                state.gold
            )
        },
    )
}

pub fn write_console_report(
    out: &mut dyn Write,
    forecast: &Forecast,
    config: ForecastConfig,
    top: usize,
) -> Result<()> {
    writeln!(out, "{}", crate::banner())?;
    writeln!(
        out,
        "Character #{}: {}",
        forecast.character.id,
        character_line(&forecast.character)
    )?;
    writeln!(
        out,
        "Horizon: {} encounters{}",
        config.horizon,
        if config.halt_on_level_up {
            " (halting on level-up)"
        } else {
            ""
        }
    )?;
    writeln!(out)?;

    writeln!(out, "{}", "📜 Upcoming encounters".bright_yellow().bold())?;
    for (index, encounter) in forecast.encounters.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. xp {:>5} -> {:<5} {}",
            index + 1,
            encounter.xp,
            encounter.next_xp,
            encounter.describe()
        )?;
    }
    writeln!(out)?;

    let surviving = forecast.surviving_paths();
    writeln!(out, "{}", "🧭 Outcome paths".bright_yellow().bold())?;
    writeln!(
        out,
        "Total paths: {} ({} surviving, {} fatal)",
        forecast.paths.len(),
        surviving.to_string().green(),
        (forecast.paths.len() - surviving).to_string().red()
    )?;
    if let Some(best) = forecast.best_path() {
        writeln!(out, "Best outcome: {}", outcome(best).green())?;
    }
    for (rank, path) in forecast.paths.iter().take(top).enumerate() {
        let status = if path.survives() {
            "✅".to_string()
        } else {
            "💀".to_string()
        };
        writeln!(out, "{status} #{} {}", rank + 1, outcome(path).bold())?;
        writeln!(out, "     {}", path.label())?;
    }
    if forecast.paths.len() > top {
        writeln!(out, "  … {} more", forecast.paths.len() - top)?;
    }
    Ok(())
}

pub fn write_json_report(out: &mut dyn Write, forecast: &Forecast) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, forecast)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_markdown_report(out: &mut dyn Write, forecast: &Forecast, top: usize) -> Result<()> {
    writeln!(out, "# Encounter Forecast\n")?;
    writeln!(out, "Character #{}: {}\n", forecast.character.id, character_line(&forecast.character))?;

    writeln!(out, "## Upcoming encounters\n")?;
    writeln!(out, "| # | XP | Next XP | Encounter |")?;
    writeln!(out, "|---|----|---------|-----------|")?;
    for (index, encounter) in forecast.encounters.iter().enumerate() {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            index + 1,
            encounter.xp,
            encounter.next_xp,
            encounter.describe()
        )?;
    }

    writeln!(out, "\n## Top paths\n")?;
    writeln!(out, "| Rank | Outcome | Decisions |")?;
    writeln!(out, "|------|---------|-----------|")?;
    for (rank, path) in forecast.paths.iter().take(top).enumerate() {
        writeln!(out, "| {} | {} | {} |", rank + 1, outcome(path), path.label())?;
    }
    Ok(())
}
