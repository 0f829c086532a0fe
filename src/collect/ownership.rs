use crate::collect::OwnershipLookup;
use crate::error::ReconError;
use crate::report::{IpLookup, Network};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// IP ownership metadata from an RDAP registry service.
pub struct RdapOwnership {
    client: Client,
    base_url: String,
}

impl RdapOwnership {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl OwnershipLookup for RdapOwnership {
    async fn lookup(&self, ip: &str) -> Result<IpLookup, ReconError> {
        let url = format!("{}/ip/{}", self.base_url.trim_end_matches('/'), ip);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ReconError::Transport(format!(
                "RDAP service returned {} for {}",
                response.status(),
                ip
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ReconError::Parse(format!("RDAP body for {}: {}", ip, e)))?;
        parse_rdap(&body)
    }
}

/// Lenient extraction of the fields consumed downstream; the remainder of
/// the registry document is preserved under `extra`.
pub fn parse_rdap(body: &Value) -> Result<IpLookup, ReconError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ReconError::Parse("RDAP response is not an object".to_string()))?;

    let str_field = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

    let cidr: Vec<String> = obj
        .get("cidr0_cidrs")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let prefix = entry
                        .get("v4prefix")
                        .or_else(|| entry.get("v6prefix"))
                        .and_then(Value::as_str)?;
                    let length = entry.get("length").and_then(Value::as_u64)?;
                    Some(format!("{}/{}", prefix, length))
                })
                .collect()
        })
        .unwrap_or_default();

    let name = str_field("name");
    let country = str_field("country");

    let mut extra = serde_json::Map::new();
    for (key, value) in obj {
        match key.as_str() {
            "name" | "country" | "cidr0_cidrs" => {}
            _ => {
                extra.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(IpLookup {
        asn_cidr: cidr.first().cloned(),
        asn_description: name.clone(),
        network: Some(Network {
            cidr,
            name,
            country,
        }),
        extra,
    })
}
