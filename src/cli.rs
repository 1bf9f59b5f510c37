use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::config::AppConfig;
use crate::data::repository::{Snapshot, SnapshotRepository};
use crate::data::tables::DirectorySource;
use crate::ingest::{build_dataset, run_cycle, IngestError};
use crate::query::views::FullView;
use crate::query::{resolve_by_id, resolve_hits, CalcParams};
use crate::server;
use crate::stats::base_stats;

const USAGE: &str = "usage: opdex <serve|validate|list|resolve|export>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Validate,
    List,
    Resolve,
    Export,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("validate") => Some(Command::Validate),
        Some("list") => Some(Command::List),
        Some("resolve") => Some(Command::Resolve),
        Some("export") => Some(Command::Export),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(config),
        Some(Command::Validate) => handle_validate(data_dir_arg(args.get(2), &config)),
        Some(Command::List) => handle_list(data_dir_arg(args.get(2), &config)),
        Some(Command::Resolve) => handle_resolve(args, &config),
        Some(Command::Export) => handle_export(data_dir_arg(args.get(2), &config)),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn data_dir_arg(raw: Option<&String>, config: &AppConfig) -> PathBuf {
    raw.map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone())
}

fn load_snapshot(dir: PathBuf) -> Result<Arc<Snapshot>, IngestError> {
    let repo = SnapshotRepository::new();
    run_cycle(&repo, &DirectorySource::new(dir))?;
    Ok(repo.current())
}

fn handle_serve(config: AppConfig) -> i32 {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return 1;
        }
    };
    match runtime.block_on(server::run_server(config)) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_validate(dir: PathBuf) -> i32 {
    let prepared = match build_dataset(&DirectorySource::new(&dir)) {
        Ok(prepared) => prepared,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    for table in &prepared.tables {
        println!("{}\trows={}\trejected={}", table.file, table.rows, table.rejected);
    }
    let report = &prepared.dataset.report;
    for diagnostic in &report.diagnostics {
        println!("- {diagnostic}");
    }
    println!(
        "validation passed: {} characters, {} diagnostic(s) in {}",
        prepared.dataset.characters.len(),
        report.diagnostics.len(),
        dir.display()
    );
    0
}

fn handle_list(dir: PathBuf) -> i32 {
    let snapshot = match load_snapshot(dir) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("load failed: {err}");
            return 1;
        }
    };
    println!("id\tname\trarity\tprofession\tsub_profession");
    for record in snapshot.characters() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            record.id, record.name, record.rarity, record.profession, record.sub_profession
        );
    }
    0
}

fn parse_i64_arg(raw: Option<&String>, name: &str) -> Result<Option<i64>, String> {
    raw.map(|value| {
        value
            .parse::<i64>()
            .map_err(|_| format!("invalid {name} '{value}'"))
    })
    .transpose()
}

/// `resolve <id> [elite] [level] [trust] [potential]`
fn parse_calc_args(args: &[String]) -> Result<CalcParams, String> {
    Ok(CalcParams {
        elite: parse_i64_arg(args.get(3), "elite")?,
        level: parse_i64_arg(args.get(4), "level")?,
        trust: parse_i64_arg(args.get(5), "trust")?,
        potential: parse_i64_arg(args.get(6), "potential")?,
    })
}

fn handle_resolve(args: &[String], config: &AppConfig) -> i32 {
    let Some(id) = args.get(2) else {
        eprintln!("usage: opdex resolve <id> [elite] [level] [trust] [potential]");
        return 2;
    };
    let params = match parse_calc_args(args) {
        Ok(params) => params,
        Err(message) => {
            eprintln!("{message}");
            return 2;
        }
    };

    let snapshot = match load_snapshot(config.data_dir.clone()) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("load failed: {err}");
            return 1;
        }
    };
    let hit = match resolve_by_id(&snapshot, id, &params) {
        Ok(hit) => hit,
        Err(err) => {
            eprintln!("resolve failed: {err}");
            return 1;
        }
    };

    match serde_json::to_string_pretty(&FullView::from(&hit)) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize resolved character: {err}");
            1
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    name: &'a str,
    rarity: u8,
    profession: &'a str,
    elite: usize,
    level: u32,
    max_hp: i64,
    atk: i64,
    def: i64,
    magic_resistance: f64,
    cost: i64,
    block_cnt: i64,
    attack_speed: f64,
    base_attack_time: f64,
    respawn_time: i64,
}

fn handle_export(dir: PathBuf) -> i32 {
    let snapshot = match load_snapshot(dir) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("load failed: {err}");
            return 1;
        }
    };

    let params = CalcParams::default();
    let progression = params.progression();
    let mut writer = csv::Writer::from_writer(io::stdout());
    for hit in resolve_hits(snapshot.characters(), &params) {
        let (elite, level, _) = base_stats(&hit.record, &progression);
        let row = ExportRow {
            id: &hit.record.id,
            name: &hit.record.name,
            rarity: hit.record.rarity.tier(),
            profession: &hit.record.profession,
            elite,
            level,
            max_hp: hit.attributes.max_hp,
            atk: hit.attributes.atk,
            def: hit.attributes.def,
            magic_resistance: hit.attributes.magic_resistance,
            cost: hit.attributes.cost,
            block_cnt: hit.attributes.block_cnt,
            attack_speed: hit.attributes.attack_speed,
            base_attack_time: hit.attributes.base_attack_time,
            respawn_time: hit.attributes.respawn_time,
        };
        if let Err(err) = writer.serialize(row) {
            eprintln!("failed to write csv row: {err}");
            return 1;
        }
    }
    if let Err(err) = writer.flush() {
        eprintln!("failed to flush csv output: {err}");
        return 1;
    }
    0
}
