use serde::{Deserialize, Serialize};

use crate::schema::{Field, Schema, Structured};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityTier {
    Light,
    #[default]
    Standard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub tier: CapabilityTier,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, tier: CapabilityTier) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            tier,
        }
    }

    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Sequential gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub has_call_to_action: bool,
    pub emotional_appeal: u8,
    pub clarity: u8,
}

impl QualityMetrics {
    pub const PASSING_SCORE: u8 = 7;

    pub fn passes_gate(&self) -> bool {
        self.has_call_to_action
            && self.emotional_appeal >= Self::PASSING_SCORE
            && self.clarity >= Self::PASSING_SCORE
    }
}

impl Structured for QualityMetrics {
    fn schema() -> Schema {
        Schema::new(
            "quality_metrics",
            vec![
                Field::boolean("hasCallToAction"),
                Field::integer("emotionalAppeal", 1, 10),
                Field::integer("clarity", 1, 10),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyResult {
    pub copy: String,
    pub metrics: QualityMetrics,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Refund,
    Technical,
}

impl Category {
    pub const VALUES: &'static [&'static str] = &["general", "refund", "technical"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Complex,
}

impl Complexity {
    pub const VALUES: &'static [&'static str] = &["simple", "complex"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub complexity: Complexity,
    pub reasoning: String,
}

impl Structured for ClassificationResult {
    fn schema() -> Schema {
        Schema::new(
            "classification",
            vec![
                Field::string("reasoning"),
                Field::enumeration("category", Category::VALUES),
                Field::enumeration("complexity", Complexity::VALUES),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutedResponse {
    pub response: String,
    pub classification: ClassificationResult,
}

// ---------------------------------------------------------------------------
// Parallel review
// ---------------------------------------------------------------------------

/// Three-step severity scale shared by risk, impact and plan complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub const VALUES: &'static [&'static str] = &["low", "medium", "high"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReview {
    pub vulnerabilities: Vec<String>,
    pub risk_level: Level,
    pub suggestions: Vec<String>,
}

impl Structured for SecurityReview {
    fn schema() -> Schema {
        Schema::new(
            "security_review",
            vec![
                Field::strings("vulnerabilities"),
                Field::enumeration("riskLevel", Level::VALUES),
                Field::strings("suggestions"),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReview {
    pub issues: Vec<String>,
    pub impact: Level,
    pub optimizations: Vec<String>,
}

impl Structured for PerformanceReview {
    fn schema() -> Schema {
        Schema::new(
            "performance_review",
            vec![
                Field::strings("issues"),
                Field::enumeration("impact", Level::VALUES),
                Field::strings("optimizations"),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintainabilityReview {
    pub concerns: Vec<String>,
    pub quality_score: u8,
    pub recommendations: Vec<String>,
}

impl Structured for MaintainabilityReview {
    fn schema() -> Schema {
        Schema::new(
            "maintainability_review",
            vec![
                Field::strings("concerns"),
                Field::integer("qualityScore", 1, 10),
                Field::strings("recommendations"),
            ],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAspect {
    Security,
    Performance,
    Maintainability,
}

/// One reviewer's findings, tagged with its aspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReviewResult {
    Security(SecurityReview),
    Performance(PerformanceReview),
    Maintainability(MaintainabilityReview),
}

impl ReviewResult {
    pub fn aspect(&self) -> ReviewAspect {
        match self {
            ReviewResult::Security(_) => ReviewAspect::Security,
            ReviewResult::Performance(_) => ReviewAspect::Performance,
            ReviewResult::Maintainability(_) => ReviewAspect::Maintainability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewReport {
    pub reviews: Vec<ReviewResult>,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Orchestrator-worker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Create,
    Modify,
    Delete,
}

impl ChangeType {
    pub const VALUES: &'static [&'static str] = &["create", "modify", "delete"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSpec {
    pub purpose: String,
    pub path: String,
    pub change_type: ChangeType,
}

impl FileSpec {
    fn fields() -> Vec<Field> {
        vec![
            Field::string("purpose"),
            Field::string("path"),
            Field::enumeration("changeType", ChangeType::VALUES),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationPlan {
    pub files: Vec<FileSpec>,
    pub estimated_complexity: Level,
}

impl Structured for ImplementationPlan {
    fn schema() -> Schema {
        Schema::new(
            "implementation_plan",
            vec![
                Field::objects("files", FileSpec::fields()),
                Field::enumeration("estimatedComplexity", Level::VALUES),
            ],
        )
    }
}

/// What a worker returns for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileImplementation {
    pub explanation: String,
    pub code: String,
}

impl Structured for FileImplementation {
    fn schema() -> Schema {
        Schema::new(
            "file_implementation",
            vec![Field::string("explanation"), Field::string("code")],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub file: FileSpec,
    pub explanation: String,
    pub code: String,
}

impl FileChange {
    pub fn new(file: FileSpec, implementation: FileImplementation) -> Self {
        Self {
            file,
            explanation: implementation.explanation,
            code: implementation.code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureResult {
    pub plan: ImplementationPlan,
    pub changes: Vec<FileChange>,
}

// ---------------------------------------------------------------------------
// Evaluator-optimizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEvaluation {
    pub quality_score: u8,
    pub preserves_tone: bool,
    pub preserves_nuance: bool,
    pub culturally_accurate: bool,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl TranslationEvaluation {
    pub const ACCEPT_SCORE: u8 = 8;

    pub fn is_acceptable(&self) -> bool {
        self.quality_score >= Self::ACCEPT_SCORE
            && self.preserves_tone
            && self.preserves_nuance
            && self.culturally_accurate
    }
}

impl Structured for TranslationEvaluation {
    fn schema() -> Schema {
        Schema::new(
            "translation_evaluation",
            vec![
                Field::integer("qualityScore", 1, 10),
                Field::boolean("preservesTone"),
                Field::boolean("preservesNuance"),
                Field::boolean("culturallyAccurate"),
                Field::strings("issues"),
                Field::strings("suggestions"),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub result: String,
    pub iterations: u32,
}

// ---------------------------------------------------------------------------
// One-shot structured generation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
}

impl WeatherCondition {
    pub const VALUES: &'static [&'static str] = &["sunny", "cloudy", "rainy"];
}

pub const MIN_TEMPERATURE: f64 = 16.0;
pub const MAX_TEMPERATURE: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyTemperature {
    pub time: String,
    pub temperature: f64,
    pub weather: WeatherCondition,
}

/// Randomly generated report for a single day, 7am to 1pm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub date: String,
    pub current_temp: f64,
    pub weather: WeatherCondition,
    pub temp_per_time: Vec<HourlyTemperature>,
}

impl Structured for WeatherReport {
    fn schema() -> Schema {
        Schema::new(
            "weather_report",
            vec![
                Field::string("date"),
                Field::number("currentTemp", MIN_TEMPERATURE, MAX_TEMPERATURE),
                Field::enumeration("weather", WeatherCondition::VALUES),
                Field::objects(
                    "tempPerTime",
                    vec![
                        Field::string("time"),
                        Field::number("temperature", MIN_TEMPERATURE, MAX_TEMPERATURE),
                        Field::enumeration("weather", WeatherCondition::VALUES),
                    ],
                ),
            ],
        )
    }
}
