use std::collections::HashSet;

use super::error::EngineError;
use super::spec::{SpecKind, Stage};
use super::task::Task;

#[cfg(test)]
mod tests;

/// Checks the whole task tree before anything runs: every name used by a
/// gated sub-task or a reference spec must be declared by a named spec
/// somewhere in the tree, and every `otherwise` must have its `if_then`.
pub(crate) fn validate_task(task: &Task) -> Result<(), EngineError> {
    if has_dangling_otherwise(task) {
        return Err(EngineError::DanglingOtherwise);
    }

    let mut declared = HashSet::new();
    collect_declared(task, &mut declared);
    check_references(task, &declared)
}

fn has_dangling_otherwise(task: &Task) -> bool {
    if task.dangling_otherwise {
        return true;
    }
    for stage in &task.stages {
        if let Stage::Branch {
            when_true,
            when_false,
            ..
        } = stage
        {
            if has_dangling_otherwise(when_true) {
                return true;
            }
            if let Some(arm) = when_false {
                if has_dangling_otherwise(arm) {
                    return true;
                }
            }
        }
    }
    task.gated
        .iter()
        .any(|(_, sub)| has_dangling_otherwise(sub))
}

fn collect_declared(task: &Task, declared: &mut HashSet<String>) {
    for stage in &task.stages {
        match stage {
            Stage::Run(specs) => {
                for spec in specs {
                    if let SpecKind::Named { name, .. } = &spec.kind {
                        declared.insert(name.clone());
                    }
                }
            }
            Stage::Branch {
                when_true,
                when_false,
                ..
            } => {
                collect_declared(when_true, declared);
                if let Some(arm) = when_false {
                    collect_declared(arm, declared);
                }
            }
        }
    }
    for (_, sub) in &task.gated {
        collect_declared(sub, declared);
    }
}

fn check_references(task: &Task, declared: &HashSet<String>) -> Result<(), EngineError> {
    for stage in &task.stages {
        match stage {
            Stage::Run(specs) => {
                for spec in specs {
                    if let SpecKind::Reference { name } = &spec.kind {
                        if !declared.contains(name) {
                            return Err(EngineError::UnknownReference { name: name.clone() });
                        }
                    }
                }
            }
            Stage::Branch {
                when_true,
                when_false,
                ..
            } => {
                check_references(when_true, declared)?;
                if let Some(arm) = when_false {
                    check_references(arm, declared)?;
                }
            }
        }
    }
    for (names, sub) in &task.gated {
        for name in names {
            if !declared.contains(name) {
                return Err(EngineError::UnknownReference { name: name.clone() });
            }
        }
        check_references(sub, declared)?;
    }
    Ok(())
}
