//! Serial console: `gatectl cmd <text>`.

use gatectl_core::{CommandConsole, CoreError, View};

use super::{Ctx, util};
use crate::cli::{CmdArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: CmdArgs, ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    util::enter_view(ctx, View::Command)?;
    let command = args.command.join(" ");

    let mut console = CommandConsole::new();
    let result = console.send(ctx.client, &command).await;

    // A rejected command still carries output worth showing.
    if matches!(result, Ok(_) | Err(CoreError::Rejected { .. })) {
        match ctx.out.format {
            OutputFormat::Table | OutputFormat::Plain => {
                output::print_output(console.output(), ctx.out.quiet);
            }
            _ => {
                if let Some(entry) = console.history().last() {
                    let value = serde_json::to_value(entry)?;
                    ctx.out.value(&value)?;
                }
            }
        }
    }

    match result {
        Ok(_) => {
            if let Some(notice) = console.notice() {
                ctx.out.notice(notice);
            }
            Ok(())
        }
        Err(e) => Err(CliError::from(e).shown_as(console.error())),
    }
}
