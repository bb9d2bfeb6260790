use crate::error::GenError;
use crate::schema::{Endpoint, ParameterField, Schema, ServiceDeclaration};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// One step of an endpoint's request handling, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PlanStep {
    /// Reject other verbs with 406
    VerbCheck { verb: String },
    /// Run the credential validator, 403 on failure
    AuthCheck,
    /// Validate one record field, 400 on failure
    Validate { field: ParameterField },
    /// Call the service method with the record and a fresh context
    Invoke,
    /// Map the method's error to a status
    ClassifyErrors,
    /// Serialize the envelope
    Envelope,
}

/// Emission plan for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointPlan {
    /// Method identifier
    pub method: String,
    /// Variant of the service's endpoint enum
    pub variant: String,
    /// Name of the generated per-endpoint handler
    pub handler: String,
    pub route: String,
    pub record: String,
    /// The record struct was found in the source
    pub record_found: bool,
    pub record_by_ref: bool,
    pub context_by_ref: bool,
    pub steps: Vec<PlanStep>,
}

impl EndpointPlan {
    pub fn verb(&self) -> Option<&str> {
        self.steps.iter().find_map(|s| match s {
            PlanStep::VerbCheck { verb } => Some(verb.as_str()),
            _ => None,
        })
    }

    pub fn requires_auth(&self) -> bool {
        self.steps.contains(&PlanStep::AuthCheck)
    }

    /// Fields validated by this endpoint, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &ParameterField> {
        self.steps.iter().filter_map(|s| match s {
            PlanStep::Validate { field } => Some(field),
            _ => None,
        })
    }
}

/// Dispatch table and endpoint plans for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePlan {
    pub service: String,
    /// Name of the generated endpoint enum
    pub endpoint_enum: String,
    pub endpoints: Vec<EndpointPlan>,
}

/// Convert snake case to CamelCase.
pub fn to_camel_case(s: &str) -> String {
    s.split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Build emission plans for every service in the schema.
///
/// Services keep declaration order. A route declared twice in one service is
/// fatal.
pub fn plan_schema(schema: &Schema) -> Result<Vec<ServicePlan>, GenError> {
    schema
        .services
        .iter()
        .filter(|svc| !svc.endpoints.is_empty())
        .map(|svc| plan_service(schema, svc))
        .collect()
}

fn plan_service(schema: &Schema, svc: &ServiceDeclaration) -> Result<ServicePlan, GenError> {
    let mut routes = HashSet::new();
    let mut variants: HashMap<String, usize> = HashMap::new();
    let mut endpoints = Vec::with_capacity(svc.endpoints.len());

    for ep in &svc.endpoints {
        if !routes.insert(ep.directive.url.as_str()) {
            return Err(GenError::DuplicateRoute {
                service: svc.name.clone(),
                route: ep.directive.url.clone(),
            });
        }
        let mut variant = to_camel_case(&ep.name);
        let seen = variants.entry(variant.clone()).or_insert(0);
        *seen += 1;
        if *seen > 1 {
            variant = format!("{variant}{seen}");
        }
        endpoints.push(plan_endpoint(schema, &svc.name, ep, variant));
    }

    debug!(service = %svc.name, endpoints = endpoints.len(), "planned service");
    Ok(ServicePlan {
        service: svc.name.clone(),
        endpoint_enum: format!("{}Endpoint", svc.name),
        endpoints,
    })
}

fn plan_endpoint(schema: &Schema, service: &str, ep: &Endpoint, variant: String) -> EndpointPlan {
    let mut steps = Vec::new();
    if let Some(verb) = &ep.directive.method {
        steps.push(PlanStep::VerbCheck { verb: verb.clone() });
    }
    if ep.directive.auth {
        steps.push(PlanStep::AuthCheck);
    }

    let record = schema.record(&ep.record);
    match record {
        Some(rec) => steps.extend(
            rec.fields
                .iter()
                .cloned()
                .map(|field| PlanStep::Validate { field }),
        ),
        None => warn!(
            service,
            endpoint = %ep.name,
            record = %ep.record,
            "record not found in source, building it with Default"
        ),
    }
    steps.extend([PlanStep::Invoke, PlanStep::ClassifyErrors, PlanStep::Envelope]);

    EndpointPlan {
        method: ep.name.clone(),
        variant,
        handler: format!("{}_http_handler", ep.name),
        route: ep.directive.url.clone(),
        record: ep.record.clone(),
        record_found: record.is_some(),
        record_by_ref: ep.record_by_ref,
        context_by_ref: ep.context_by_ref,
        steps,
    }
}
