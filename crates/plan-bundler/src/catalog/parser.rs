use super::plan::{CostSharingLimit, MetalLevel, Plan, PlanType};
use super::CatalogError;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

pub(crate) fn parse_plans<R: Read>(reader: R) -> Result<Vec<Plan>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut plans = Vec::new();

    for (index, record) in csv_reader.deserialize::<PlanRow>().enumerate() {
        let row = record?;
        // header occupies line 1
        let line = index + 2;
        plans.push(row.into_plan(line)?);
    }

    Ok(plans)
}

#[derive(Debug, Deserialize)]
struct PlanRow {
    plan_id: String,
    plan_marketing_name: String,
    plan_type: String,
    metal_level: String,
    #[serde(default)]
    state_code: String,
    individual_rate: String,
    actuarial_value: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_hsa_eligible: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    deductible_individual: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    deductible_family: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    moop_individual: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    moop_family: Option<String>,
    #[serde(default)]
    network_id: String,
    #[serde(default)]
    service_area_id: String,
    #[serde(default)]
    covered_benefits: String,
    #[serde(default)]
    copays: String,
    #[serde(default)]
    coinsurance: String,
}

impl PlanRow {
    fn into_plan(self, line: usize) -> Result<Plan, CatalogError> {
        let invalid = |field: &'static str, value: &str| CatalogError::InvalidRow {
            line,
            field,
            value: value.to_string(),
        };

        let plan_type: PlanType = self
            .plan_type
            .parse()
            .map_err(|_| invalid("plan_type", &self.plan_type))?;
        let metal_level: MetalLevel = self
            .metal_level
            .parse()
            .map_err(|_| invalid("metal_level", &self.metal_level))?;
        let individual_rate = parse_amount(&self.individual_rate)
            .ok_or_else(|| invalid("individual_rate", &self.individual_rate))?;
        let actuarial_value = parse_amount(&self.actuarial_value)
            .ok_or_else(|| invalid("actuarial_value", &self.actuarial_value))?;
        let hsa_eligible = match self.is_hsa_eligible.as_deref() {
            Some(raw) => parse_flag(raw).ok_or_else(|| invalid("is_hsa_eligible", raw))?,
            None => false,
        };

        let optional =
            |field: &'static str, raw: &Option<String>| -> Result<Option<f64>, CatalogError> {
                raw.as_deref()
                    .map(|value| parse_amount(value).ok_or_else(|| invalid(field, value)))
                    .transpose()
            };

        Ok(Plan {
            plan_id: self.plan_id,
            marketing_name: self.plan_marketing_name,
            plan_type,
            metal_level,
            state_code: self.state_code.to_ascii_uppercase(),
            individual_rate,
            actuarial_value,
            hsa_eligible,
            deductible: CostSharingLimit {
                individual: optional("deductible_individual", &self.deductible_individual)?,
                family: optional("deductible_family", &self.deductible_family)?,
            },
            moop: CostSharingLimit {
                individual: optional("moop_individual", &self.moop_individual)?,
                family: optional("moop_family", &self.moop_family)?,
            },
            network_id: self.network_id,
            service_area_id: self.service_area_id,
            covered_benefits: split_list(&self.covered_benefits),
            copays: split_table(&self.copays),
            coinsurance: split_table(&self.coinsurance),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts `1234.50`, `$1,234.50` and `69.9%` style cells.
fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%'))
        .collect();
    cleaned.parse::<f64>().ok()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> BTreeSet<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_table(value: &str) -> BTreeMap<String, String> {
    value
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(benefit, display)| (benefit.trim().to_string(), display.trim().to_string()))
        .filter(|(benefit, _)| !benefit.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_tolerate_currency_and_percent_marks() {
        assert_eq!(parse_amount("$1,250.00"), Some(1250.0));
        assert_eq!(parse_amount("69.9%"), Some(69.9));
        assert_eq!(parse_amount("n/a"), None);
    }

    #[test]
    fn flags_accept_marketplace_spellings() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag("n"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn benefit_tables_split_on_semicolons() {
        let table = split_table("Primary Care=$25 copay; Specialist = $50 copay;broken");
        assert_eq!(table.len(), 2);
        assert_eq!(table["Specialist"], "$50 copay");

        let benefits = split_list("Primary Care; Generic Drugs;;Primary Care");
        assert_eq!(benefits.len(), 2);
    }
}
