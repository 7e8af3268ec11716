// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async IPP client for the bot's printer.
//
// Uses the `ipp` crate's async API to send:
//   - Get-Printer-Attributes  (RFC 8011 §4.2.5)
//   - Print-Job               (RFC 8011 §4.2.1)
//   - Identify-Printer        (PWG 5100.13 §3.2.1)

use std::io::Cursor;

use async_trait::async_trait;
use ipp::prelude::*;
use tracing::{debug, error, info, instrument};

use printbot_core::attributes::PrinterStatus;
use printbot_core::error::{PrintbotError, Result};
use printbot_core::types::{OptionValue, PrintRequest};

use crate::printer::PrinterClient;

/// Job template options whose integer values are IPP enums rather than
/// plain integers.
const ENUM_OPTIONS: &[&str] = &["print-quality", "orientation-requested", "finishings"];

/// Async IPP client wrapping the `ipp` crate.
///
/// Each instance is bound to a single printer URI.
pub struct IppClient {
    /// The target printer URI (ipp:// or ipps://).
    uri: Uri,
}

impl IppClient {
    /// Create a new client targeting the given printer URI.
    pub fn new(uri: &str) -> Result<Self> {
        let parsed: Uri = uri
            .parse()
            .map_err(|e| PrintbotError::IppRequest(format!("invalid URI '{uri}': {e}")))?;
        Ok(Self { uri: parsed })
    }

    /// Return the printer URI this client is targeting.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Send one request and insist on a successful status code.
    async fn send<R>(&self, operation: &str, request: R) -> Result<IppRequestResponse>
    where
        R: Into<IppRequestResponse>,
    {
        let client = AsyncIppClient::new(self.uri.clone());

        debug!(operation, "sending IPP request");
        let response = client
            .send(request)
            .await
            .map_err(|e| PrintbotError::PrinterUnavailable(format!("{operation}: {e}")))?;

        if !response.header().status_code().is_success() {
            let code = response.header().status_code();
            error!(operation, status = ?code, "IPP request rejected");
            return Err(PrintbotError::IppRequest(format!(
                "{operation} returned status {code:?}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl PrinterClient for IppClient {
    /// Sends Get-Printer-Attributes, restricted to `attributes` when given.
    #[instrument(skip(self), fields(uri = %self.uri))]
    async fn printer_status(&self, attributes: &[String]) -> Result<PrinterStatus> {
        let mut builder = IppOperationBuilder::get_printer_attributes(self.uri.clone());
        if !attributes.is_empty() {
            builder = builder.attributes(attributes);
        }

        let response = self.send("Get-Printer-Attributes", builder.build()).await?;

        let status = flatten_printer_attributes(response.attributes());
        debug!(count = status.len(), "received printer attributes");
        Ok(status)
    }

    #[instrument(skip(self), fields(uri = %self.uri))]
    async fn identify(&self) -> Result<bool> {
        let request = IppRequestResponse::new(
            IppVersion::v1_1(),
            Operation::IdentifyPrinter,
            Some(self.uri.clone()),
        );

        match self.send("Identify-Printer", request).await {
            Ok(_) => {
                info!("printer identified itself");
                Ok(true)
            }
            Err(PrintbotError::IppRequest(detail)) => {
                debug!(%detail, "printer declined Identify-Printer");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(
        skip(self, request),
        fields(uri = %self.uri, job_name = %request.job_name, submitter = %request.submitter)
    )]
    async fn print_file(&self, request: PrintRequest) -> Result<()> {
        let size = request.content.len();
        let payload = IppPayload::new(Cursor::new(request.content));

        let mut builder = IppOperationBuilder::print_job(self.uri.clone(), payload)
            .user_name(&request.submitter)
            .job_title(&request.job_name);

        if let Some(format) = &request.file_type {
            builder = builder.document_format(format);
        }

        for (name, value) in request.job_attributes.iter().flatten() {
            builder = builder.attribute(IppAttribute::new(name, job_attribute_value(name, value)));
        }

        info!(size, "sending Print-Job");
        let response = self.send("Print-Job", builder.build()).await?;

        match extract_job_id(response.attributes()) {
            Some(job_id) => info!(job_id, "print job accepted by printer"),
            None => info!("print job accepted by printer without job-id"),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helper functions for building and parsing IPP messages
// ---------------------------------------------------------------------------

/// IPP value for a stored job option.
fn job_attribute_value(name: &str, value: &OptionValue) -> IppValue {
    match value {
        OptionValue::Integer(n) => {
            let n = i32::try_from(*n).unwrap_or(i32::MAX);
            if ENUM_OPTIONS.contains(&name) {
                IppValue::Enum(n)
            } else {
                IppValue::Integer(n)
            }
        }
        OptionValue::Text(s) => IppValue::Keyword(s.clone()),
    }
}

/// Collect the Printer Attributes groups of a response into a status map.
fn flatten_printer_attributes(attrs: &IppAttributes) -> PrinterStatus {
    let mut status = PrinterStatus::new();
    for group in attrs.groups_of(DelimiterTag::PrinterAttributes) {
        for (name, attr) in group.attributes() {
            status.insert(name.clone(), option_values(attr.value()));
        }
    }
    status
}

/// Multi-valued attributes become one entry per value; integers and enums
/// stay numeric, everything else uses its IPP text form.
fn option_values(value: &IppValue) -> Vec<OptionValue> {
    match value {
        IppValue::Array(items) => items.iter().flat_map(option_values).collect(),
        IppValue::Integer(n) | IppValue::Enum(n) => vec![OptionValue::Integer(i64::from(*n))],
        other => vec![OptionValue::Text(other.to_string())],
    }
}

/// Extract the `job-id` integer from a response's Job Attributes group.
fn extract_job_id(attrs: &IppAttributes) -> Option<i32> {
    for group in attrs.groups_of(DelimiterTag::JobAttributes) {
        if let Some(attr) = group.attributes().get("job-id")
            && let IppValue::Integer(id) = attr.value()
        {
            return Some(*id);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_uri() {
        let result = IppClient::new("not a valid uri %%%");
        assert!(result.is_err());
    }

    #[test]
    fn new_accepts_valid_ipp_uri() {
        let client = IppClient::new("ipp://192.168.1.100:631/ipp/print");
        assert!(client.is_ok());
    }

    #[test]
    fn arrays_flatten_in_order() {
        let value = IppValue::Array(vec![
            IppValue::Keyword("A4".into()),
            IppValue::Keyword("Letter".into()),
        ]);
        assert_eq!(
            option_values(&value),
            vec![OptionValue::from("A4"), OptionValue::from("Letter")]
        );
    }

    #[test]
    fn integers_stay_numeric() {
        assert_eq!(option_values(&IppValue::Integer(1)), vec![OptionValue::Integer(1)]);
        assert_eq!(option_values(&IppValue::Enum(4)), vec![OptionValue::Integer(4)]);
    }

    #[test]
    fn quality_is_sent_as_enum() {
        assert!(matches!(
            job_attribute_value("print-quality", &OptionValue::Integer(5)),
            IppValue::Enum(5)
        ));
        assert!(matches!(
            job_attribute_value("copies", &OptionValue::Integer(2)),
            IppValue::Integer(2)
        ));
        assert!(matches!(
            job_attribute_value("media", &OptionValue::from("A4")),
            IppValue::Keyword(_)
        ));
    }
}
