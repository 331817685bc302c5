use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dynamics::state::{LorenzParams, SimConfig, State};
use crate::error::LorenzError;
use crate::sim::{Lorenz, Method};

// ---------------------------------------------------------------------------
// Case: one parameter preset plus the methods to run it with
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub id: u32,
    pub initial: State,
    pub params: LorenzParams,
    pub methods: Vec<Method>,
    pub config: SimConfig,
}

impl Case {
    /// Fresh integrator for this case.
    pub fn lorenz(&self) -> Lorenz {
        Lorenz::new(self.initial, self.params, self.config)
    }

    /// Directory name used for this case's outputs.
    pub fn dir_name(&self) -> String {
        format!("case_{}", self.id)
    }
}

// ---------------------------------------------------------------------------
// Case builder
// ---------------------------------------------------------------------------

pub struct CaseBuilder {
    id: u32,
    initial: State,
    params: LorenzParams,
    methods: Vec<Method>,
    config: SimConfig,
}

impl CaseBuilder {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            initial: State::new(1.0, 1.0, 1.0),
            params: LorenzParams::default(),
            methods: vec![],
            config: SimConfig::default(),
        }
    }

    pub fn initial(mut self, x: f64, y: f64, z: f64) -> Self {
        self.initial = State::new(x, y, z);
        self
    }

    pub fn sigma(mut self, v: f64) -> Self { self.params.sigma = v; self }
    pub fn beta(mut self, v: f64) -> Self { self.params.beta = v; self }
    pub fn rho(mut self, v: f64) -> Self { self.params.rho = v; self }
    pub fn dt(mut self, v: f64) -> Self { self.config.dt = v; self }
    pub fn steps(mut self, n: usize) -> Self { self.config.steps = n; self }

    pub fn method(mut self, m: Method) -> Self {
        if !self.methods.contains(&m) {
            self.methods.push(m);
        }
        self
    }

    pub fn build(self) -> Case {
        let methods = if self.methods.is_empty() {
            vec![Method::default()]
        } else {
            self.methods
        };
        Case {
            id: self.id,
            initial: self.initial,
            params: self.params,
            methods,
            config: self.config,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON case files
// ---------------------------------------------------------------------------

/// On-disk shape of one case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSpec {
    pub id: u32,
    #[serde(default = "CaseSpec::default_initial")]
    pub initial_conditions: [f64; 3],
    pub sigma: f64,
    pub beta: f64,
    pub rho: f64,
    #[serde(default = "CaseSpec::default_methods")]
    pub methods: Vec<String>,
    #[serde(default)]
    pub dt: Option<f64>,
    #[serde(default)]
    pub steps: Option<usize>,
}

impl CaseSpec {
    fn default_initial() -> [f64; 3] {
        [1.0, 1.0, 1.0]
    }

    fn default_methods() -> Vec<String> {
        vec![Method::default().name().to_string()]
    }
}

impl From<&Case> for CaseSpec {
    fn from(case: &Case) -> Self {
        CaseSpec {
            id: case.id,
            initial_conditions: [case.initial.x, case.initial.y, case.initial.z],
            sigma: case.params.sigma,
            beta: case.params.beta,
            rho: case.params.rho,
            methods: case.methods.iter().map(|m| m.name().to_string()).collect(),
            dt: Some(case.config.dt),
            steps: Some(case.config.steps),
        }
    }
}

impl TryFrom<CaseSpec> for Case {
    type Error = LorenzError;

    fn try_from(raw: CaseSpec) -> Result<Self, Self::Error> {
        let [x, y, z] = raw.initial_conditions;
        let mut builder = CaseBuilder::new(raw.id)
            .initial(x, y, z)
            .sigma(raw.sigma)
            .beta(raw.beta)
            .rho(raw.rho);

        for name in &raw.methods {
            builder = builder.method(name.parse()?);
        }
        if let Some(dt) = raw.dt {
            if !(dt.is_finite() && dt > 0.0) {
                return Err(LorenzError::invalid("dt", dt.to_string(), "a positive finite number"));
            }
            builder = builder.dt(dt);
        }
        if let Some(n) = raw.steps {
            builder = builder.steps(n);
        }
        Ok(builder.build())
    }
}

/// Parse a JSON array of cases.
pub fn parse_cases(json: &str) -> Result<Vec<Case>> {
    let specs: Vec<CaseSpec> = serde_json::from_str(json).context("Malformed case file")?;
    specs
        .into_iter()
        .map(|raw| {
            let id = raw.id;
            Case::try_from(raw).with_context(|| format!("Invalid case {}", id))
        })
        .collect()
}

pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<Case>> {
    let path = path.as_ref();
    log::info!("Loading cases from {:?}", path);
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read case file {:?}", path))?;
    parse_cases(&text)
}

// ---------------------------------------------------------------------------
// Preset cases
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// The five reference regimes, all from (1, 1, 1) with Euler:
    /// rho 6 and 16 settle onto a fixed point, rho 28 is the classic
    /// butterfly, then sigma and beta are pushed further.
    pub fn all() -> Vec<Case> {
        vec![
            standard(1).rho(6.0).build(),
            standard(2).rho(16.0).build(),
            standard(3).rho(28.0).build(),
            standard(4).sigma(14.0).rho(28.0).build(),
            standard(5).sigma(14.0).beta(13.0 / 3.0).rho(28.0).build(),
        ]
    }

    pub fn by_id(id: u32) -> Option<Case> {
        all().into_iter().find(|c| c.id == id)
    }

    fn standard(id: u32) -> CaseBuilder {
        CaseBuilder::new(id)
            .initial(1.0, 1.0, 1.0)
            .sigma(10.0)
            .beta(8.0 / 3.0)
            .method(Method::Euler)
    }
}
