use super::prompts;
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use watchlist_config::{
    default_openrouter_model, Config, OpenRouterConfig, PathManager, SupabaseConfig, YoutubeConfig,
};

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show(full, output),
        ConfigCommands::Init { force } => init(force, output),
        ConfigCommands::Supabase { url, anon_key } => configure_supabase(url, anon_key, output),
        ConfigCommands::Youtube { api_key } => configure_youtube(api_key, output),
        ConfigCommands::Openrouter { api_key, model } => {
            configure_openrouter(api_key, model, output)
        }
    }
}

fn show(full: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();

    if !config_file.exists() {
        output.info(format!(
            "No configuration file found at: {}",
            config_file.display()
        ));
        output.info("Run 'nextup config init' to create one. Everything works offline without it.");
        return Ok(());
    }

    let config = Config::load_from_file(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut info_table = Table::new();
            info_table.set_header(vec![
                Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
                Cell::new(config_file.display().to_string()),
            ]);
            info_table.load_preset(comfy_table::presets::UTF8_FULL);
            info_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", info_table);
            println!();

            if let Some(supabase) = &config.supabase {
                let mut table = provider_table("Supabase (account sync)");
                table.add_row(vec![Cell::new("Enabled"), enabled_cell(supabase.enabled)]);
                table.add_row(vec![Cell::new("URL"), Cell::new(&supabase.url)]);
                table.add_row(vec![
                    Cell::new("Anon key"),
                    Cell::new(display_secret(&supabase.anon_key, full)),
                ]);
                println!("{}", table);
                println!();
            } else {
                println!("{}", "Supabase: Not configured".bright_black());
                println!();
            }

            if let Some(youtube) = &config.youtube {
                let mut table = provider_table("YouTube (video lookup)");
                table.add_row(vec![Cell::new("Enabled"), enabled_cell(youtube.enabled)]);
                table.add_row(vec![
                    Cell::new("API key"),
                    Cell::new(display_secret(&youtube.api_key, full)),
                ]);
                println!("{}", table);
                println!();
            } else {
                println!("{}", "YouTube: Not configured".bright_black());
                println!();
            }

            if let Some(openrouter) = &config.openrouter {
                let mut table = provider_table("OpenRouter (title analysis)");
                table.add_row(vec![Cell::new("Enabled"), enabled_cell(openrouter.enabled)]);
                table.add_row(vec![
                    Cell::new("API key"),
                    Cell::new(display_secret(&openrouter.api_key, full)),
                ]);
                table.add_row(vec![Cell::new("Model"), Cell::new(&openrouter.model)]);
                println!("{}", table);
                println!();
            } else {
                println!("{}", "OpenRouter: Not configured".bright_black());
                println!();
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "supabase": config.supabase.as_ref().map(|s| json!({
                    "enabled": s.enabled,
                    "url": s.url,
                    "anon_key": display_secret(&s.anon_key, full),
                })),
                "youtube": config.youtube.as_ref().map(|y| json!({
                    "enabled": y.enabled,
                    "api_key": display_secret(&y.api_key, full),
                })),
                "openrouter": config.openrouter.as_ref().map(|o| json!({
                    "enabled": o.enabled,
                    "api_key": display_secret(&o.api_key, full),
                    "model": o.model,
                })),
            }));
        }
    }
    Ok(())
}

fn init(force: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create config directories: {}", e))?;

    let config_file = paths.config_file();
    if config_file.exists() && !force {
        return Err(eyre!(
            "Config file already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
    }

    Config::template()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write config template: {}", e))?;

    output.success(format!("Wrote config template to {}", config_file.display()));
    output.info("Fill in the [supabase], [youtube] and [openrouter] sections you plan to use.");
    Ok(())
}

fn configure_supabase(
    url_arg: Option<String>,
    anon_key_arg: Option<String>,
    output: &Output,
) -> Result<()> {
    let paths = PathManager::default();
    let mut config = load_for_edit(&paths, output)?;

    let url = match url_arg {
        Some(url) => url,
        None => {
            let existing = config.supabase.as_ref().map(|s| s.url.as_str());
            loop {
                let input = prompts::prompt_string("Supabase project URL", existing)?;
                if input.starts_with("http://") || input.starts_with("https://") {
                    break input;
                }
                output.warn("The URL should look like https://PROJECT.supabase.co");
            }
        }
    };
    let url = url.trim_end_matches('/').to_string();
    if url.is_empty() {
        return Err(eyre!("Project URL is required"));
    }

    let anon_key = match anon_key_arg {
        Some(key) => key,
        None => prompts::prompt_password("Supabase anon key")?,
    };
    let anon_key = anon_key.trim().to_string();
    if anon_key.is_empty() {
        return Err(eyre!("Anon key is required"));
    }

    config.supabase = Some(SupabaseConfig {
        enabled: true,
        url,
        anon_key,
    });
    save_config(&config, &paths)?;

    output.success("Supabase backend configured");
    output.info("Sign in with 'nextup auth login' to start syncing.");
    Ok(())
}

fn configure_youtube(api_key_arg: Option<String>, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let mut config = load_for_edit(&paths, output)?;

    let api_key = match api_key_arg {
        Some(key) => key,
        None => prompts::prompt_password("YouTube Data API key")?,
    };
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(eyre!("API key is required"));
    }

    config.youtube = Some(YoutubeConfig {
        enabled: true,
        api_key,
    });
    save_config(&config, &paths)?;

    output.success("YouTube lookup configured");
    output.info("Attach videos with 'nextup add --video-id <id>'.");
    Ok(())
}

fn configure_openrouter(
    api_key_arg: Option<String>,
    model_arg: Option<String>,
    output: &Output,
) -> Result<()> {
    let paths = PathManager::default();
    let mut config = load_for_edit(&paths, output)?;

    let api_key = match api_key_arg {
        Some(key) => key,
        None => prompts::prompt_password("OpenRouter API key")?,
    };
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(eyre!("API key is required"));
    }

    let model = match model_arg {
        Some(model) => model,
        None => {
            let existing = config
                .openrouter
                .as_ref()
                .map(|o| o.model.clone())
                .unwrap_or_else(default_openrouter_model);
            prompts::prompt_string("Model", Some(&existing))?
        }
    };

    config.openrouter = Some(OpenRouterConfig {
        enabled: true,
        api_key,
        model,
    });
    save_config(&config, &paths)?;

    output.success("OpenRouter title analysis configured");
    output.info("Mood-aware runs of 'nextup recommend' will now rate titles.");
    Ok(())
}

fn load_for_edit(paths: &PathManager, output: &Output) -> Result<Config> {
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create config directories: {}", e))?;

    let config_file = paths.config_file();
    if config_file.exists() {
        Config::load_from_file(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))
    } else {
        output.info("No configuration file found, starting a fresh one.");
        Ok(Config::default())
    }
}

fn save_config(config: &Config, paths: &PathManager) -> Result<()> {
    let config_file = paths.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))
}

fn provider_table(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new(title)
        .fg(comfy_table::Color::Cyan)
        .add_attribute(comfy_table::Attribute::Bold)]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn enabled_cell(enabled: bool) -> Cell {
    Cell::new(if enabled {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    })
}

fn display_secret(value: &str, full: bool) -> String {
    if full {
        return value.to_string();
    }
    mask_string(value)
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s.starts_with("YOUR_") {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}
