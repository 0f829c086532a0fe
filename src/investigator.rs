use crate::collect::{
    BuiltWithProbe, DigCommand, DnsLookup, HeaderFetch, HeaderProbe, IpinfoTraceroute,
    OwnershipLookup, RdapOwnership, Resolve, SiteFingerprint, SystemResolver, TechFingerprint,
    TracerouteLookup, WappalyzerProbe,
};
use crate::config::Config;
use crate::error::ReconError;
use crate::narrative::{degraded_message, NarrativeService, OpenAiNarrative};
use crate::report::{assemble, Report};
use crate::target::Target;
use anyhow::Context;
use reqwest::Client;
use std::time::Duration;

/// Per-step success/failure status surfaced to the operator.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub name: &'static str,
    pub ok: bool,
    pub detail: Option<String>,
}

impl StepOutcome {
    fn success(name: &'static str) -> Self {
        Self {
            name,
            ok: true,
            detail: None,
        }
    }

    fn failure(name: &'static str, detail: String) -> Self {
        Self {
            name,
            ok: false,
            detail: Some(detail),
        }
    }
}

/// Result of one investigation run: the assembled report plus the per-step
/// status trail. Partial reports are first-class and exportable.
#[derive(Debug)]
pub struct Investigation {
    pub report: Report,
    pub resolved_ip: Option<String>,
    pub steps: Vec<StepOutcome>,
    pub generated_at: String,
}

/// Runs the collectors against one target and assembles the report.
///
/// Collectors are injected as capabilities so tests can substitute
/// deterministic fakes for the live services. Each run is independent; no
/// state is shared between runs.
pub struct Investigator {
    resolver: Box<dyn Resolve>,
    traceroute: Box<dyn TracerouteLookup>,
    dns: Box<dyn DnsLookup>,
    ownership: Box<dyn OwnershipLookup>,
    tech: Box<dyn TechFingerprint>,
    headers: Box<dyn HeaderFetch>,
    site: Box<dyn SiteFingerprint>,
    narrative: Box<dyn NarrativeService>,
}

impl Investigator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resolver: Box<dyn Resolve>,
        traceroute: Box<dyn TracerouteLookup>,
        dns: Box<dyn DnsLookup>,
        ownership: Box<dyn OwnershipLookup>,
        tech: Box<dyn TechFingerprint>,
        headers: Box<dyn HeaderFetch>,
        site: Box<dyn SiteFingerprint>,
        narrative: Box<dyn NarrativeService>,
    ) -> Self {
        Self {
            resolver,
            traceroute,
            dns,
            ownership,
            tech,
            headers,
            site,
            narrative,
        }
    }

    /// Wire the live collector implementations from configuration.
    pub fn with_defaults(config: &Config) -> crate::Result<Self> {
        let timeout = Duration::from_secs(config.recon.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.recon.user_agent.clone())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self::new(
            Box::new(SystemResolver::new(timeout)),
            Box::new(IpinfoTraceroute::new(
                client.clone(),
                config.recon.traceroute_base_url.clone(),
                config.recon.traceroute_token.clone(),
            )),
            Box::new(DigCommand::new(timeout)),
            Box::new(RdapOwnership::new(
                client.clone(),
                config.recon.rdap_base_url.clone(),
            )),
            Box::new(BuiltWithProbe::new(client.clone())),
            Box::new(HeaderProbe::new(client.clone())),
            Box::new(WappalyzerProbe::new(client)),
            Box::new(OpenAiNarrative::new(config.narrative.clone())),
        ))
    }

    /// Run a full investigation. Only an invalid target aborts the run;
    /// every collector failure is recorded as a step outcome and an absent
    /// report field, and the remaining collectors still execute.
    pub async fn run(&self, input: &str, with_narrative: bool) -> Result<Investigation, ReconError> {
        let target = Target::parse(input)?;
        let mut steps = Vec::new();

        let resolved_ip = match self.resolver.resolve(target.host()).await {
            Ok(ip) => {
                steps.push(StepOutcome::success("resolution"));
                Some(ip)
            }
            Err(e) => {
                steps.push(StepOutcome::failure("resolution", e.to_string()));
                None
            }
        };

        let traceroute = match &resolved_ip {
            Some(ip) => record(&mut steps, "traceroute", self.traceroute.traceroute(ip).await),
            None => skip_unresolved(&mut steps, "traceroute"),
        };

        let dns = record(&mut steps, "dns", self.dns.lookup(target.host()).await);

        let ip_lookup = match &resolved_ip {
            Some(ip) => record(&mut steps, "ip lookup", self.ownership.lookup(ip).await),
            None => skip_unresolved(&mut steps, "ip lookup"),
        };

        let tech_stack = record(
            &mut steps,
            "tech stack",
            self.tech.fingerprint(target.url()).await,
        );
        let infrastructure = record(
            &mut steps,
            "infrastructure",
            self.headers.fetch(target.url()).await,
        );
        let site_details = record(
            &mut steps,
            "site details",
            self.site.fingerprint(target.url()).await,
        );

        let mut report = assemble(
            target.host(),
            traceroute,
            dns,
            ip_lookup,
            tech_stack,
            infrastructure,
            site_details,
        );

        if with_narrative {
            // A failed narrative degrades to an error message string in the
            // report body and a failed step; it never blocks the run.
            match self.narrative.summarize(&report).await {
                Ok(description) => {
                    report.narrative = Some(description);
                    steps.push(StepOutcome::success("narrative"));
                }
                Err(e) => {
                    report.narrative = Some(degraded_message(&e));
                    steps.push(StepOutcome::failure("narrative", e.to_string()));
                }
            }
        }

        Ok(Investigation {
            report,
            resolved_ip,
            steps,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

fn record<T>(
    steps: &mut Vec<StepOutcome>,
    name: &'static str,
    result: Result<T, ReconError>,
) -> Option<T> {
    match result {
        Ok(value) => {
            steps.push(StepOutcome::success(name));
            Some(value)
        }
        Err(e) => {
            steps.push(StepOutcome::failure(name, e.to_string()));
            None
        }
    }
}

fn skip_unresolved<T>(steps: &mut Vec<StepOutcome>, name: &'static str) -> Option<T> {
    steps.push(StepOutcome::failure(
        name,
        "skipped: domain did not resolve".to_string(),
    ));
    None
}
