//! Raw request passthrough for endpoints without a dedicated command.

use gatectl_api::{Method, Payload, RequestBody};
use serde_json::Value;

use super::{Ctx, util};
use crate::cli::RawArgs;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: RawArgs, ctx: &mut Ctx<'_>) -> Result<(), CliError> {
    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes()).map_err(|_| {
        CliError::Validation {
            field: "method".into(),
            reason: format!("'{}' is not an HTTP method", args.method),
        }
    })?;

    let body = if let Some(ref data) = args.data {
        RequestBody::Json(serde_json::from_str::<Value>(data)?)
    } else if let Some(ref path) = args.data_file {
        RequestBody::Json(util::read_json_file(path)?)
    } else {
        RequestBody::Empty
    };

    let payload = ctx
        .client
        .request(method, &args.path, body)
        .await
        .map_err(|e| CliError::from(gatectl_core::CoreError::from(e)))?;

    match payload {
        Payload::Json(value) => ctx.out.value(&value),
        Payload::Text(text) => {
            output::print_output(text.trim_end(), ctx.out.quiet);
            Ok(())
        }
    }
}
