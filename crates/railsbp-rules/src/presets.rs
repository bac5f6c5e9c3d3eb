//! Assembling the built-in checks from configuration.

use crate::lexicals::{LongLineCheck, RemoveTabCheck, RemoveTrailingWhitespaceCheck};
use crate::prepares::{
    ConfigPrepare, ControllerPrepare, GemfilePrepare, HelperPrepare, ModelPrepare, RoutePrepare,
    SchemaPrepare,
};
use crate::reviews::{
    AlwaysAddDbIndexReview, LawOfDemeterReview, MoveModelLogicIntoModelReview,
    NeedlessDeepNestingReview, OveruseRouteCustomizationsReview, ProtectMassAssignmentReview,
    RemoveUnusedMethodsInControllersReview, RestrictAutoGeneratedRoutesReview,
};
use railsbp_core::{
    normalize_check_name, AnalyzerBuilder, Check, CheckBox, CheckConfig, Config, FilePattern,
    PatternError,
};
use std::fmt;
use tracing::debug;

/// Phase a check runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Raw file text, before parsing.
    Lexical,
    /// Fills the symbol tables; never reports.
    Prepare,
    /// Reports, reading the symbol tables.
    Review,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical => write!(f, "lexical"),
            Self::Prepare => write!(f, "prepare"),
            Self::Review => write!(f, "review"),
        }
    }
}

/// A check shipped with this crate.
pub trait BuiltinCheck: Sized {
    /// Name used in configuration and disable comments.
    const NAME: &'static str;

    /// Phase the check runs in.
    const STAGE: Stage;

    /// Reads the check's options.
    fn configure(config: &CheckConfig) -> Self;

    /// Builds the runnable check, skipping `ignored` files.
    fn build(self, ignored: Vec<FilePattern>) -> CheckBox;
}

/// Name and stage of a built-in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInfo {
    /// Check name.
    pub name: &'static str,
    /// Phase it runs in.
    pub stage: Stage,
}

impl CheckInfo {
    fn of<C: BuiltinCheck>() -> Self {
        Self {
            name: C::NAME,
            stage: C::STAGE,
        }
    }
}

/// Configured checks, grouped by phase.
#[derive(Default)]
pub struct CheckSet {
    /// Text checks.
    pub lexicals: Vec<CheckBox>,
    /// Symbol-table builders.
    pub prepares: Vec<CheckBox>,
    /// Reporting checks.
    pub reviews: Vec<CheckBox>,
}

impl fmt::Debug for CheckSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |checks: &[CheckBox]| checks.iter().map(|c| c.name().to_string()).collect::<Vec<_>>();
        f.debug_struct("CheckSet")
            .field("lexicals", &names(&self.lexicals))
            .field("prepares", &names(&self.prepares))
            .field("reviews", &names(&self.reviews))
            .finish()
    }
}

macro_rules! builtin_checks {
    ($($check:ty),* $(,)?) => {
        fn register_all(set: &mut CheckSet, config: &Config) -> Result<(), PatternError> {
            $(set.add::<$check>(config)?;)*
            Ok(())
        }

        /// Every built-in check, in registration order.
        #[must_use]
        pub fn builtin_checks() -> Vec<CheckInfo> {
            vec![$(CheckInfo::of::<$check>(),)*]
        }
    };
}

builtin_checks! {
    RemoveTabCheck,
    RemoveTrailingWhitespaceCheck,
    LongLineCheck,
    GemfilePrepare,
    ConfigPrepare,
    RoutePrepare,
    SchemaPrepare,
    ModelPrepare,
    HelperPrepare,
    ControllerPrepare,
    MoveModelLogicIntoModelReview,
    LawOfDemeterReview,
    RemoveUnusedMethodsInControllersReview,
    RestrictAutoGeneratedRoutesReview,
    OveruseRouteCustomizationsReview,
    NeedlessDeepNestingReview,
    AlwaysAddDbIndexReview,
    ProtectMassAssignmentReview,
}

impl CheckSet {
    /// Builds every enabled check with its configured options.
    ///
    /// Prepare checks are always built: reviews depend on their tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a check's `ignored_files` holds an invalid regex.
    pub fn from_config(config: &Config) -> Result<Self, PatternError> {
        let mut set = Self::default();
        register_all(&mut set, config)?;
        debug!(
            lexicals = set.lexicals.len(),
            prepares = set.prepares.len(),
            reviews = set.reviews.len(),
            "built check set"
        );
        Ok(set)
    }

    fn add<C: BuiltinCheck>(&mut self, config: &Config) -> Result<(), PatternError> {
        if C::STAGE != Stage::Prepare && !config.is_check_enabled(C::NAME) {
            debug!(check = C::NAME, "disabled by configuration");
            return Ok(());
        }
        let options = config.check_options(C::NAME);
        let check = C::configure(&options).build(options.ignored_patterns()?);
        match C::STAGE {
            Stage::Lexical => self.lexicals.push(check),
            Stage::Prepare => self.prepares.push(check),
            Stage::Review => self.reviews.push(check),
        }
        Ok(())
    }

    /// Keeps only the named lexical and review checks. `XCheck` and
    /// `XReview` name the same check.
    #[must_use]
    pub fn only(mut self, names: &[String]) -> Self {
        let wanted: Vec<&str> = names.iter().map(|n| normalize_check_name(n)).collect();
        let keep = |check: &CheckBox| {
            let name = normalize_check_name(check.name());
            wanted.iter().any(|w| *w == name)
        };
        self.lexicals.retain(keep);
        self.reviews.retain(keep);
        self
    }

    /// Number of reporting checks.
    #[must_use]
    pub fn reporting_len(&self) -> usize {
        self.lexicals.len() + self.reviews.len()
    }

    /// Adds every check to an analyzer builder.
    #[must_use]
    pub fn install(self, builder: AnalyzerBuilder) -> AnalyzerBuilder {
        let builder = self
            .lexicals
            .into_iter()
            .fold(builder, AnalyzerBuilder::lexical_box);
        let builder = self
            .prepares
            .into_iter()
            .fold(builder, AnalyzerBuilder::prepare_box);
        self.reviews
            .into_iter()
            .fold(builder, AnalyzerBuilder::review_box)
    }
}
