//! Ordered pass list for the frame compositor, validated once at setup.
//!
//! The opaque scene is rendered by Bevy's own passes before the list runs, so
//! [`TargetRole::Scene`] counts as written from the start. The scene and the
//! screen are the same storage (the view's main texture), which the
//! read/write checks take into account.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetRole {
    /// Main colour and depth as left by the opaque and transparent passes.
    Scene,
    /// Off-screen colour and depth owned by the compositor.
    Composite,
    /// Main colour, written back for presentation.
    Screen,
}

impl TargetRole {
    fn storage(self) -> TargetRole {
        match self {
            TargetRole::Screen => TargetRole::Scene,
            role => role,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSpec {
    pub role: TargetRole,
    pub has_depth: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassShader {
    Copy { depth: bool },
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassDescriptor {
    pub label: &'static str,
    pub read: TargetRole,
    pub write: TargetRole,
    pub shader: PassShader,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PassListError {
    #[error("pass list has no passes")]
    Empty,
    #[error("target {0:?} is declared more than once")]
    DuplicateTarget(TargetRole),
    #[error("pass `{pass}` uses undeclared target {target:?}")]
    UndeclaredTarget { pass: &'static str, target: TargetRole },
    #[error("pass `{pass}` reads the screen")]
    ScreenAsSource { pass: &'static str },
    #[error("pass `{pass}` reads {target:?}, which it also writes")]
    ReadsOwnOutput { pass: &'static str, target: TargetRole },
    #[error("pass `{pass}` reads {target:?} before any pass has written it")]
    ReadBeforeWrite { pass: &'static str, target: TargetRole },
    #[error("pass `{pass}` copies depth from {target:?}, which has no depth")]
    DepthCopyFromColourOnly { pass: &'static str, target: TargetRole },
    #[error("pass `{pass}` copies depth into {target:?}, which has no depth")]
    DepthCopyIntoColourOnly { pass: &'static str, target: TargetRole },
    #[error("water pass `{pass}` needs depth on {target:?}")]
    WaterWithoutDepth { pass: &'static str, target: TargetRole },
    #[error("final pass `{pass}` writes {target:?} instead of the screen")]
    FinalPassNotScreen { pass: &'static str, target: TargetRole },
}

/// A pass sequence that has passed [`PassList::new`]'s checks.
#[derive(Debug, Clone)]
pub struct PassList {
    targets: Vec<TargetSpec>,
    passes: Vec<PassDescriptor>,
}

impl PassList {
    pub fn new(
        targets: Vec<TargetSpec>,
        passes: Vec<PassDescriptor>,
    ) -> Result<Self, PassListError> {
        for (index, spec) in targets.iter().enumerate() {
            if targets[..index].iter().any(|other| other.role == spec.role) {
                return Err(PassListError::DuplicateTarget(spec.role));
            }
        }
        let Some(last) = passes.last() else {
            return Err(PassListError::Empty);
        };
        if last.write != TargetRole::Screen {
            return Err(PassListError::FinalPassNotScreen {
                pass: last.label,
                target: last.write,
            });
        }

        let mut written = vec![TargetRole::Scene];
        for pass in &passes {
            let read = lookup(&targets, pass.label, pass.read)?;
            let write = lookup(&targets, pass.label, pass.write)?;

            if pass.read == TargetRole::Screen {
                return Err(PassListError::ScreenAsSource { pass: pass.label });
            }
            if pass.read.storage() == pass.write.storage() {
                return Err(PassListError::ReadsOwnOutput {
                    pass: pass.label,
                    target: pass.read,
                });
            }
            if !written.contains(&pass.read.storage()) {
                return Err(PassListError::ReadBeforeWrite {
                    pass: pass.label,
                    target: pass.read,
                });
            }

            match pass.shader {
                PassShader::Copy { depth: true } => {
                    if !read.has_depth {
                        return Err(PassListError::DepthCopyFromColourOnly {
                            pass: pass.label,
                            target: pass.read,
                        });
                    }
                    if !write.has_depth {
                        return Err(PassListError::DepthCopyIntoColourOnly {
                            pass: pass.label,
                            target: pass.write,
                        });
                    }
                }
                PassShader::Copy { depth: false } => {}
                PassShader::Water => {
                    if let Some(spec) = [read, write].into_iter().find(|spec| !spec.has_depth) {
                        return Err(PassListError::WaterWithoutDepth {
                            pass: pass.label,
                            target: spec.role,
                        });
                    }
                }
            }

            written.push(pass.write.storage());
        }

        Ok(Self { targets, passes })
    }

    /// Scene → composite (with depth), water into the composite, composite → screen.
    pub fn ocean_default() -> Result<Self, PassListError> {
        Self::new(
            vec![
                TargetSpec {
                    role: TargetRole::Scene,
                    has_depth: true,
                },
                TargetSpec {
                    role: TargetRole::Composite,
                    has_depth: true,
                },
                TargetSpec {
                    role: TargetRole::Screen,
                    has_depth: false,
                },
            ],
            vec![
                PassDescriptor {
                    label: "scene_copy",
                    read: TargetRole::Scene,
                    write: TargetRole::Composite,
                    shader: PassShader::Copy { depth: true },
                },
                PassDescriptor {
                    label: "water",
                    read: TargetRole::Scene,
                    write: TargetRole::Composite,
                    shader: PassShader::Water,
                },
                PassDescriptor {
                    label: "output_copy",
                    read: TargetRole::Composite,
                    write: TargetRole::Screen,
                    shader: PassShader::Copy { depth: false },
                },
            ],
        )
    }

    pub fn passes(&self) -> &[PassDescriptor] {
        &self.passes
    }

    pub fn target(&self, role: TargetRole) -> Option<&TargetSpec> {
        self.targets.iter().find(|spec| spec.role == role)
    }
}

fn lookup(
    targets: &[TargetSpec],
    pass: &'static str,
    role: TargetRole,
) -> Result<TargetSpec, PassListError> {
    targets
        .iter()
        .find(|spec| spec.role == role)
        .copied()
        .ok_or(PassListError::UndeclaredTarget { pass, target: role })
}
