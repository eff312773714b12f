use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};

use scout_similarity::config::AppConfig;
use scout_similarity::error::ScoutError;
use scout_similarity::export;
use scout_similarity::service::ScoutService;

struct Args {
    player: String,
    data_dir: Option<PathBuf>,
    top_n: Option<usize>,
    age_max: Option<u32>,
    value_max: Option<String>,
    xlsx: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let config = AppConfig::bootstrap();
    let args = parse_args(std::env::args().skip(1).collect())?;

    let data_dir = args.data_dir.clone().unwrap_or(config.data_dir);
    let service = ScoutService::load(&data_dir)?;
    let top_n = args.top_n.unwrap_or(config.default_top_n);

    let rows = match service.similar(&args.player, top_n, args.age_max, args.value_max.as_deref()) {
        Ok(rows) => rows,
        Err(err @ ScoutError::PlayerNotFound(_)) => {
            eprintln!("{err}");
            let hits = service.find_by_name_substring(&args.player);
            if !hits.is_empty() {
                eprintln!("Did you mean:");
                for name in hits.iter().take(8) {
                    eprintln!(" - {name}");
                }
            }
            return Ok(ExitCode::from(2));
        }
        Err(err) => return Err(err.into()),
    };

    println!("Players similar to {}", args.player);
    if rows.is_empty() {
        println!("(no candidates match the filters)");
    }
    for (idx, row) in rows.iter().enumerate() {
        println!(
            "{:>3}. {:<28} {:>3} {:<22} {:<22} {:>10}  {:.3}",
            idx + 1,
            row.name,
            row.age,
            row.team,
            row.position,
            row.market_value,
            row.similarity
        );
    }

    if let Some(path) = args.xlsx {
        let report = export::export_similar_players(&path, &args.player, &rows)?;
        println!("Wrote {} rows to {}", report.rows, path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_args(args: Vec<String>) -> Result<Args> {
    let mut out = Args {
        player: String::new(),
        data_dir: None,
        top_n: None,
        age_max: None,
        value_max: None,
        xlsx: None,
    };
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
            _ => (arg.clone(), None),
        };
        if !flag.starts_with("--") {
            if out.player.is_empty() {
                out.player = arg;
            } else {
                out.player = format!("{} {}", out.player, arg);
            }
            continue;
        }
        let Some(value) = inline.or_else(|| iter.next()) else {
            bail!("missing value for {flag}");
        };
        match flag.as_str() {
            "--data" => out.data_dir = Some(PathBuf::from(value)),
            "--top" => out.top_n = Some(value.parse()?),
            "--age-max" => out.age_max = Some(value.parse()?),
            "--value-max" => out.value_max = Some(value),
            "--xlsx" => out.xlsx = Some(PathBuf::from(value)),
            other => bail!("unknown flag {other}"),
        }
    }
    if out.player.trim().is_empty() {
        bail!(
            "usage: similar_players <player name> [--data DIR] [--top N] [--age-max N] [--value-max TEXT] [--xlsx PATH]"
        );
    }
    Ok(out)
}
