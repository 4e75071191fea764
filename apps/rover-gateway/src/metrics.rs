use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct GatewayMetrics {
    pub questions: IntCounterVec,
    pub command_polls: IntCounter,
    pub plan_submissions: IntCounterVec,
    pub instruction_polls: IntCounter,
    pub plan_stored: IntGauge,
}

#[derive(Clone)]
pub struct MetricsHub {
    pub registry: Registry,
    pub gw: GatewayMetrics,
}

impl MetricsHub {
    pub fn new() -> Result<Self, String> {
        let registry = Registry::new();
        let questions = IntCounterVec::new(
            Opts::new("rover_questions_total", "Questions handled by /ask"),
            &["outcome"],
        )
        .map_err(|e| format!("metrics init error: {e}"))?;
        let command_polls =
            IntCounter::new("rover_command_polls_total", "Actuator command polls served")
                .map_err(|e| format!("metrics init error: {e}"))?;
        let plan_submissions = IntCounterVec::new(
            Opts::new("rover_plan_submissions_total", "Field plan submissions"),
            &["outcome"],
        )
        .map_err(|e| format!("metrics init error: {e}"))?;
        let instruction_polls = IntCounter::new(
            "rover_instruction_polls_total",
            "Traversal instruction polls served",
        )
        .map_err(|e| format!("metrics init error: {e}"))?;
        let plan_stored = IntGauge::new("rover_plan_stored", "1 when a field plan is stored")
            .map_err(|e| format!("metrics init error: {e}"))?;

        let gw = GatewayMetrics {
            questions,
            command_polls,
            plan_submissions,
            instruction_polls,
            plan_stored,
        };
        let _ = registry.register(Box::new(gw.questions.clone()));
        let _ = registry.register(Box::new(gw.command_polls.clone()));
        let _ = registry.register(Box::new(gw.plan_submissions.clone()));
        let _ = registry.register(Box::new(gw.instruction_polls.clone()));
        let _ = registry.register(Box::new(gw.plan_stored.clone()));
        Ok(Self { registry, gw })
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
