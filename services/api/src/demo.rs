use crate::infra::{load_catalog, read_request};
use clap::Args;
use plan_bundler::catalog::{MetalLevel, PlanType};
use plan_bundler::config::CatalogConfig;
use plan_bundler::error::AppError;
use plan_bundler::optimization::{
    Bundle, ConstraintSet, EmployeeGroupProfile, OptimizationRequest, OptimizationResult,
    OptimizationService, Recommendation, TobaccoPreference,
};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Plan catalog CSV to use instead of the bundled sample.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the raw result JSON after the summary.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct OptimizeArgs {
    /// JSON file holding `groups` and `constraints`
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Plan catalog CSV (defaults to APP_CATALOG_PATH, then the bundled sample)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Pretty-print the result JSON
    #[arg(long)]
    pub(crate) pretty: bool,
}

pub(crate) fn run_optimize(args: OptimizeArgs) -> Result<(), AppError> {
    let OptimizeArgs {
        request,
        catalog,
        pretty,
    } = args;

    let request = read_request(&request)?;
    let result = optimize_with_catalog(catalog, &request)?;

    let rendered = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { catalog, json } = args;

    let request = demo_request();
    println!("Plan bundler demo");
    println!(
        "Constraints: premium <= ${:.2}/mo | AV >= {:.1}% | {} {} plans",
        request.constraints.max_monthly_premium,
        request.constraints.min_actuarial_value,
        request.constraints.preferred_metal_level,
        request.constraints.preferred_plan_type
    );

    let result = optimize_with_catalog(catalog, &request)?;
    render_result(&result);

    if json {
        println!("\n{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

fn optimize_with_catalog(
    catalog: Option<PathBuf>,
    request: &OptimizationRequest,
) -> Result<OptimizationResult, AppError> {
    let config = match catalog {
        Some(path) => CatalogConfig { path: Some(path) },
        None => plan_bundler::config::AppConfig::load()?.catalog,
    };
    let catalog = load_catalog(&config)?;
    let service = OptimizationService::new(Arc::new(catalog));
    Ok(service.optimize(request)?)
}

fn demo_request() -> OptimizationRequest {
    let group = |label: &str, headcount: u32, age_range: &str, budget_cap: f64| {
        EmployeeGroupProfile {
            label: label.to_string(),
            headcount,
            age_range: age_range.to_string(),
            budget_cap,
            state_code: "FL".to_string(),
            tobacco_preference: TobaccoPreference::NoPreference,
        }
    };

    OptimizationRequest {
        groups: vec![
            group("Engineering", 24, "25-44", 450.0),
            group("Customer Support", 12, "18-34", 300.0),
        ],
        constraints: ConstraintSet {
            max_monthly_premium: 550.0,
            min_actuarial_value: 60.0,
            preferred_metal_level: MetalLevel::Low,
            preferred_plan_type: PlanType::Ppo,
            max_deductible: None,
            hsa_only: false,
            required_benefits: BTreeSet::from(["Primary Care Visit".to_string()]),
        },
    }
}

fn render_result(result: &OptimizationResult) {
    for bundle in &result.bundles {
        render_bundle(bundle);
    }

    println!(
        "\nStatus: {} | total employer cost ${:.2}/yr",
        result.status.label(),
        result.total_cost
    );
    if let Some(message) = &result.message {
        println!("Note: {message}");
    }
}

fn render_bundle(bundle: &Bundle) {
    println!(
        "\n{} ({} eligible plans)",
        bundle.group_label, bundle.eligible_plan_count
    );

    match &bundle.recommendation {
        Recommendation::Plan(top) => {
            println!(
                "- Recommended: {} [{}] utility {:.2}",
                top.plan.marketing_name, top.plan.plan_id, top.utility_score
            );
            println!(
                "  ${:.2}/mo | employer ${:.2}/yr | employee ${:.2}/yr",
                bundle.cost.monthly_premium,
                bundle.cost.employer_contribution,
                bundle.cost.employee_contribution
            );
        }
        Recommendation::NoPlan => println!("- No plan satisfies the constraints"),
    }

    if let Some(coverage) = &bundle.coverage {
        println!(
            "  Coverage {} | network {:.1} | risk protection {:.1}",
            coverage.coverage_level.label(),
            coverage.network_strength,
            coverage.risk_protection
        );
    }

    for alternative in &bundle.alternatives {
        println!(
            "  Alternative: {} [{}] utility {:.2}",
            alternative.plan.marketing_name, alternative.plan.plan_id, alternative.utility_score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_bundler::catalog::InMemoryPlanCatalog;
    use plan_bundler::optimization::OptimizationStatus;

    #[test]
    fn demo_request_is_feasible_against_sample_catalog() {
        let catalog = InMemoryPlanCatalog::sample().expect("sample catalog");
        let service = OptimizationService::new(Arc::new(catalog));

        let result = service.optimize(&demo_request()).expect("demo runs");

        assert_eq!(result.status, OptimizationStatus::Optimal);
        assert_eq!(result.bundles.len(), 2);
        for bundle in &result.bundles {
            assert_eq!(bundle.eligible_plan_count, 3);
            let top = bundle.recommendation.plan().expect("plan recommended");
            assert_eq!(top.plan.plan_id, "16842FL0260006-02");
            assert_eq!(bundle.alternatives.len(), 2);
        }
    }
}
