use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use intake_cli::edits::{EditSet, apply_edits};
use intake_ingest::{IngestOptions, UploadedFile, Workbook, read_workbook};
use intake_map::MappingSession;
use intake_submit::{HttpTransport, RecipientEmail, SubmitConfig, Submitter};

use crate::cli::{InspectArgs, MapArgs, SourceArgs, SubmitArgs};
use crate::summary::{print_columns, print_prepared, print_raw_rows, print_report, print_sheets};

fn load_workbook(source: &SourceArgs) -> Result<Workbook> {
    let file = UploadedFile::from_path(&source.file)?;
    let options = IngestOptions {
        max_file_size_mb: source.max_file_size_mb,
    };
    read_workbook(file, &options).with_context(|| format!("read {}", source.file.display()))
}

fn load_session(source: &SourceArgs, edits: &EditSet) -> Result<(Workbook, MappingSession)> {
    let workbook = load_workbook(source)?;
    let mut session = MappingSession::from_workbook(&workbook, source.wizard);
    apply_edits(&mut session, edits).context("apply mapping edits")?;
    Ok((workbook, session))
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let (workbook, session) = load_session(&args.source, &EditSet::default())?;
    println!(
        "File: {} ({} of {} sheets with data)",
        workbook.file.name,
        workbook.sheet_count(),
        workbook.sheet_names.len()
    );
    println!("Wizard: {}", session.wizard());
    print_sheets(&session);
    for sheet in session.sheets() {
        if args.rows > 0 {
            print_raw_rows(sheet, args.rows);
        }
        print_columns(sheet);
    }
    Ok(())
}

/// Returns whether every selected sheet is ready to submit.
pub fn run_map(args: &MapArgs) -> Result<bool> {
    let (_workbook, session) = load_session(&args.source, &args.edits)?;
    print_sheets(&session);
    for sheet in session.selected_sheets() {
        print_columns(sheet);
    }
    match session.check_ready() {
        Ok(ids) => {
            println!("Ready: {} sheet(s) selected", ids.len());
            Ok(true)
        }
        Err(error) => {
            println!("Not ready: {error}");
            Ok(false)
        }
    }
}

pub fn run_submit(args: &SubmitArgs) -> Result<()> {
    let (workbook, session) = load_session(&args.source, &args.edits)?;
    let config = submit_config(args)?;
    let span = info_span!("submit", file = %workbook.file.name, server = %config.server_url);
    let _guard = span.enter();

    let transport = HttpTransport::new().context("create HTTP client")?;
    let submitter = Submitter::new(transport, config);

    if args.dry_run {
        let prepared = submitter.prepare(&session, &workbook)?;
        info!(count = prepared.len(), "dry run: nothing sent");
        print_prepared(&prepared);
        return Ok(());
    }

    match submitter.submit(&session, &workbook) {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(error) => {
            if let Some(sheet) = error.sheet() {
                warn!(sheet, "submission stopped; earlier sheets were already sent");
            }
            Err(error.into())
        }
    }
}

/// Config file, then flags.
fn submit_config(args: &SubmitArgs) -> Result<SubmitConfig> {
    let mut config = match &args.config {
        Some(path) => SubmitConfig::load(path)?,
        None => SubmitConfig::default(),
    };
    if let Some(server) = &args.server {
        config.server_url = server.clone();
    }
    if let Some(email) = &args.email {
        config.recipient = Some(RecipientEmail::parse(email)?);
    } else if let Some(url) = &args.page_url {
        config.recipient = Some(RecipientEmail::from_page_url(url)?);
    }

    let options = &mut config.options;
    if let Some(currency) = args.currency {
        options.currency = currency;
    }
    options.is_icon_distro |= args.icon_distro;
    options.is_ai_mode |= args.ai_mode;
    options.skip_data_warehouse |= args.skip_data_warehouse;
    options.is_new_distro |= args.new_distro;
    Ok(config)
}
