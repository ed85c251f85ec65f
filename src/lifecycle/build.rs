//! Build stage: configure and compile the checkout.

use crate::builder::cmake::CMakeDriver;
use crate::builder::definitions::DefinitionSet;
use crate::lifecycle::errors::BuildError;
use crate::recipe::Settings;
use crate::util::context::RunContext;
use crate::util::process::ProcessRunner;

pub(crate) fn run(
    runner: &dyn ProcessRunner,
    ctx: &RunContext,
    settings: &Settings,
    definitions: DefinitionSet,
) -> Result<(), BuildError> {
    let build_dir = ctx.build_dir();
    std::fs::create_dir_all(&build_dir).map_err(|e| BuildError::Workspace {
        path: build_dir.clone(),
        source: e,
    })?;

    let driver = CMakeDriver::for_run(runner, ctx, settings).definitions(definitions);
    driver.configure().map_err(BuildError::Configure)?;
    driver.build().map_err(BuildError::Compile)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::definitions::translate;
    use crate::recipe::options::declare_options;
    use crate::test_support::{linux_gcc, CannedOutput, ScriptedRunner};
    use tempfile::TempDir;

    #[test]
    fn test_build_configures_then_compiles() {
        let tmp = TempDir::new().unwrap();
        let ctx = RunContext::new(tmp.path(), tmp.path()).unwrap();

        let runner = ScriptedRunner::new();
        runner.expect_prefix("cmake -S", CannedOutput::success());
        runner.expect_prefix("cmake --build", CannedOutput::success());

        run(&runner, &ctx, &linux_gcc(), translate(&declare_options())).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].command.contains("-DCMAKE_POSITION_INDEPENDENT_CODE=ON"));
        assert!(calls[1].command.starts_with("cmake --build"));
        assert!(ctx.build_dir().is_dir());
    }

    #[test]
    fn test_configure_failure_stops_the_stage() {
        let tmp = TempDir::new().unwrap();
        let ctx = RunContext::new(tmp.path(), tmp.path()).unwrap();

        let runner = ScriptedRunner::new();
        runner.expect_prefix("cmake -S", CannedOutput::failure(1));

        let err = run(&runner, &ctx, &linux_gcc(), DefinitionSet::new()).unwrap_err();
        assert!(matches!(err, BuildError::Configure(_)));
        assert_eq!(runner.calls().len(), 1);
    }
}
