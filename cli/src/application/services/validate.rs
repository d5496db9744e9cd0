//! Post-deployment validation: suite loading and the two engines.
//!
//! Check files are loaded and fully resolved (operation names, kwargs) before
//! the pipeline touches any device, so a malformed suite aborts the run
//! instead of surfacing halfway through validation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use confleet_common::checks::{CheckSpec, parse_check_document};
use confleet_common::{CheckOutcome, HostReport};
use serde_json::Value;

use crate::application::ports::{CheckProvider, CommandExecutor, ProgressReporter, StateFetcher};
use crate::application::services::peers::{self, OspfPeerArgs, PeerOp};
use crate::domain::compliance;
use crate::domain::{Engine, Host, Platform};

/// One resolved imperative check: registry-typed operation plus decoded args.
#[derive(Debug, Clone)]
pub struct PeerCheck {
    pub op: PeerOp,
    pub label: String,
    pub args: OspfPeerArgs,
    pub expected: Value,
}

/// All checks for the whole fleet, keyed by hostname.
#[derive(Debug, Clone, Default)]
pub struct ValidationSuite {
    pub declarative: BTreeMap<String, Vec<CheckSpec>>,
    pub imperative: BTreeMap<String, Vec<PeerCheck>>,
}

/// Load and resolve both engines' check files for every host.
///
/// A host without a check file contributes no checks for that engine (warned,
/// not fatal). Malformed documents, unknown operation names, and undecodable
/// kwargs are fatal — they are configuration bugs, caught before deployment.
pub async fn load_suite(
    provider: &impl CheckProvider,
    hosts: &[Host],
    reporter: &impl ProgressReporter,
) -> Result<ValidationSuite> {
    let mut suite = ValidationSuite::default();

    for host in hosts {
        match provider
            .check_document(&host.hostname, Engine::Declarative)
            .await?
        {
            Some(doc) => {
                let checks = parse_check_document(&doc).with_context(|| {
                    format!("parsing declarative checks for '{}'", host.hostname)
                })?;
                suite.declarative.insert(host.hostname.clone(), checks);
            }
            None => reporter.warn(&format!(
                "no {} checks defined for '{}'",
                Engine::Declarative.label(),
                host.hostname
            )),
        }

        match provider
            .check_document(&host.hostname, Engine::Imperative)
            .await?
        {
            Some(doc) => {
                let specs = parse_check_document(&doc).with_context(|| {
                    format!("parsing imperative checks for '{}'", host.hostname)
                })?;
                let checks = specs
                    .into_iter()
                    .map(|spec| resolve_peer_check(&host.hostname, spec))
                    .collect::<Result<Vec<_>>>()?;
                suite.imperative.insert(host.hostname.clone(), checks);
            }
            None => reporter.warn(&format!(
                "no {} checks defined for '{}'",
                Engine::Imperative.label(),
                host.hostname
            )),
        }
    }

    Ok(suite)
}

fn resolve_peer_check(hostname: &str, spec: CheckSpec) -> Result<PeerCheck> {
    let op = PeerOp::from_name(&spec.operation)
        .with_context(|| format!("loading imperative checks for '{hostname}'"))?;
    let args: OspfPeerArgs = serde_json::from_value(Value::Object(spec.kwargs))
        .with_context(|| format!("decoding _kwargs of '{}' for '{hostname}'", spec.label))?;
    Ok(PeerCheck {
        op,
        label: spec.label,
        args,
        expected: spec.expected,
    })
}

/// Run the declarative engine for one host: fetch each getter's actual state
/// and compare it against the expected structure.
pub async fn declarative_report(
    fetcher: &impl StateFetcher,
    host: &Host,
    checks: &[CheckSpec],
) -> HostReport {
    let mut report = HostReport::new();
    for check in checks {
        let outcome = match fetcher
            .fetch_state(host, &check.operation, &check.kwargs)
            .await
        {
            Ok(actual) => compliance::verdict(&check.expected, &actual),
            Err(err) => CheckOutcome::Error {
                message: format!("{err:#}"),
            },
        };
        report.insert(check.label.clone(), outcome);
    }
    report
}

/// Run the imperative engine for one host. Errors become error outcomes, a
/// platform without an implementation yields skipped outcomes — validation
/// never aborts the pipeline.
pub async fn imperative_report(
    executor: &impl CommandExecutor,
    host: &Host,
    checks: &[PeerCheck],
) -> HostReport {
    let mut report = HostReport::new();
    for check in checks {
        let outcome = if !supported(host.platform) {
            CheckOutcome::Skipped {
                reason: format!("not implemented for platform '{:?}'", host.platform),
            }
        } else {
            let actual = match check.op {
                PeerOp::OspfPeer => peers::ospf_peer(executor, host, &check.args).await,
            };
            match actual {
                Ok(actual) => compliance::verdict(&check.expected, &actual),
                Err(err) => CheckOutcome::Error {
                    message: format!("{err:#}"),
                },
            }
        };
        report.insert(check.label.clone(), outcome);
    }
    report
}

fn supported(platform: Platform) -> bool {
    matches!(platform, Platform::Nxos | Platform::Eos)
}
