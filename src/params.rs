//! Parameter preparation against a service's declared schema.

use crate::service::ServiceDefinition;
use crate::types::Params;
use crate::{Error, Result};

/// Filter `raw` down to the service's declared parameters, applying
/// required/default rules.
///
/// Undeclared keys are dropped. Supplied values are used verbatim.
pub fn prepare_params(service: &ServiceDefinition, raw: &Params) -> Result<Params> {
    let mut prepared = Params::new();
    for (name, spec) in &service.params {
        match raw.get(name) {
            Some(value) => {
                prepared.insert(name.clone(), value.clone());
            }
            None if spec.required => return Err(Error::MissingParameter(name.clone())),
            None => {
                if let Some(default) = &spec.default {
                    prepared.insert(name.clone(), default.clone());
                }
            }
        }
    }
    Ok(prepared)
}
