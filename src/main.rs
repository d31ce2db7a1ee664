//! sqlview - A lightweight result viewer and query console for a remote SQL engine.

use std::sync::Arc;

use sqlview::api::{EngineApi, HttpEngineClient};
use sqlview::catalog::ExampleCatalog;
use sqlview::cli::{Cli, Command};
use sqlview::config::Config;
use sqlview::controller::{ExecutionState, QueryController};
use sqlview::directory::{select_statement, DirectoryState, TableDirectory};
use sqlview::error::Result;
use sqlview::pagination::PageCursor;
use sqlview::{logging, render};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        for line in render::render_error(&e) {
            eprintln!("{line}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    info!("Engine API: {}", config.api.url);
    let api: Arc<dyn EngineApi> = Arc::new(HttpEngineClient::new(&config.api)?);

    match &cli.command {
        Command::Query { sql } => run_query(api, &config, sql, cli.page).await,
        Command::Tables { select } => run_tables(api, &config, cli.page, *select).await,
        Command::Examples => {
            run_examples(&config, cli.page);
            Ok(())
        }
        Command::Batch { queries } => run_batch(api.as_ref(), &config, queries).await,
    }
}

async fn run_query(api: Arc<dyn EngineApi>, config: &Config, sql: &str, page: usize) -> Result<()> {
    let mut controller = QueryController::new(api.clone(), config.pagination.results_page_size);
    let mut refresh = controller.subscribe_refresh();

    controller.set_query_text(sql);
    controller.submit().await;
    controller.go_to_results_page(page);

    if let ExecutionState::Failed(e) = controller.state() {
        return Err(e.clone());
    }
    print_lines(render::render_state(controller.state(), controller.results_cursor()));

    if refresh.has_changed().unwrap_or(false) {
        let mut directory = TableDirectory::new(api, config.pagination.tables_page_size);
        directory.sync(&mut refresh).await;
        if let DirectoryState::Loaded(tables) = directory.state() {
            println!("Tables: {}", tables.join(", "));
        }
    }
    Ok(())
}

async fn run_tables(
    api: Arc<dyn EngineApi>,
    config: &Config,
    page: usize,
    select: Option<usize>,
) -> Result<()> {
    let mut directory = TableDirectory::new(api, config.pagination.tables_page_size);
    if let DirectoryState::Failed(e) = directory.fetch().await {
        return Err(e.clone());
    }

    directory.go_to_page(page);
    let view = directory.page();

    if let Some(index) = select {
        if let Some(name) = view.items.get(index) {
            println!("{}", select_statement(name));
        }
        return Ok(());
    }

    if view.items.is_empty() {
        println!("(no tables)");
    }
    for (i, name) in view.items.iter().enumerate() {
        println!("{i:>3}. {name}");
    }
    println!("{}", render::footer(&view));
    Ok(())
}

fn run_examples(config: &Config, page: usize) {
    let mut catalog = ExampleCatalog::new(config.pagination.examples_page_size);
    let total = catalog.entries().len();
    catalog.cursor_mut().go_to(page, total);

    let view = catalog.page();
    for (i, example) in view.items.iter().enumerate() {
        println!("{i:>3}. {}", example.title);
        for line in example.sql.lines() {
            println!("       {line}");
        }
    }
    println!("{}", render::footer(&view));
}

async fn run_batch(api: &dyn EngineApi, config: &Config, queries: &[String]) -> Result<()> {
    let entries = api.batch(queries).await?;
    let cursor = PageCursor::new(config.pagination.results_page_size);
    for entry in entries {
        println!("> {}", entry.query);
        print_lines(render::render_result(&entry.result, &cursor));
        println!();
    }
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
