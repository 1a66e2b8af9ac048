use std::sync::Arc;

use super::require_object;
use crate::config::ScriptsConfig;
use crate::expect::expect;
use crate::manifest::Manifest;
use crate::runner::Suite;

pub fn register(suite: &mut Suite, manifest: &Arc<Manifest>, config: &ScriptsConfig) {
    let pkg = Arc::clone(manifest);
    suite.test("declares a scripts object", move || {
        require_object("scripts", pkg.get("scripts"))
    });

    for script in &config.required {
        let pkg = Arc::clone(manifest);
        let script = script.clone();
        suite.test(format!("defines the \"{script}\" script"), move || {
            expect(pkg.root())
                .to_have_property("scripts")?
                .to_have_property(&script)?
                .to_match(r"\S")?;
            Ok(())
        });
    }
}
