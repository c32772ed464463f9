//! Link parameter selection for imported libraries.
//!
//! One import is one logical library. For each of the four linking modes
//! the selector picks the single artifact that represents it on the link
//! line, and the shared objects that must be staged for execution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::builder::solib::{mangle, StagedRuntimePath};
use crate::core::artifact::LibraryArtifact;
use crate::core::import::ImportDeclaration;

/// A linking mode requested by the build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkingMode {
    /// Link statically regardless of what is available
    pub statically: bool,

    /// Prefer the shared form when possible
    pub shared_preferred: bool,
}

impl LinkingMode {
    /// All four modes, in index order.
    pub const ALL: [LinkingMode; 4] = [
        LinkingMode::new(false, false),
        LinkingMode::new(false, true),
        LinkingMode::new(true, false),
        LinkingMode::new(true, true),
    ];

    pub const fn new(statically: bool, shared_preferred: bool) -> Self {
        LinkingMode {
            statically,
            shared_preferred,
        }
    }

    fn index(self) -> usize {
        ((self.statically as usize) << 1) | (self.shared_preferred as usize)
    }
}

impl fmt::Display for LinkingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "statically={}, shared_preferred={}",
            self.statically, self.shared_preferred
        )
    }
}

/// How the linker should treat a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCategory {
    StaticLibrary,
    /// Static archive whose objects are all linked (`--whole-archive`)
    AlwaysLinkStaticLibrary,
    DynamicLibrary,
    InterfaceLibrary,
}

impl ArtifactCategory {
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            ArtifactCategory::StaticLibrary | ArtifactCategory::AlwaysLinkStaticLibrary
        )
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtifactCategory::StaticLibrary => "static library",
            ArtifactCategory::AlwaysLinkStaticLibrary => "alwayslink static library",
            ArtifactCategory::DynamicLibrary => "dynamic library",
            ArtifactCategory::InterfaceLibrary => "interface library",
        };
        f.write_str(s)
    }
}

/// The library placed on the link line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibraryToLink {
    pub artifact: LibraryArtifact,
    pub category: ArtifactCategory,

    /// Staged copy, present only when `artifact` is itself the shared object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staged: Option<StagedRuntimePath>,
}

/// Link inputs for one linking mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkParams {
    /// Libraries to link, in order
    pub libraries: Vec<LibraryToLink>,

    /// Shared libraries that must be staged for execution
    pub execution_dynamic_libraries: Vec<StagedRuntimePath>,
}

impl LinkParams {
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty() && self.execution_dynamic_libraries.is_empty()
    }
}

/// Link inputs for every linking mode of one import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkParameterSet {
    params: [LinkParams; 4],
}

impl LinkParameterSet {
    /// Link inputs for a mode given as a flag pair.
    pub fn get(&self, statically: bool, shared_preferred: bool) -> &LinkParams {
        self.for_mode(LinkingMode::new(statically, shared_preferred))
    }

    pub fn for_mode(&self, mode: LinkingMode) -> &LinkParams {
        &self.params[mode.index()]
    }

    /// Iterate `(mode, params)` pairs in mode order.
    pub fn iter(&self) -> impl Iterator<Item = (LinkingMode, &LinkParams)> {
        LinkingMode::ALL.into_iter().map(move |mode| (mode, self.for_mode(mode)))
    }
}

/// Compute the link parameters of `decl` for every linking mode.
///
/// Selection always targets the platform `decl` was validated for.
pub fn select(decl: &ImportDeclaration) -> LinkParameterSet {
    let staged = staged_shared_library(decl);
    LinkParameterSet {
        params: LinkingMode::ALL.map(|mode| select_for_mode(decl, staged.as_ref(), mode)),
    }
}

/// The staged copy of the shared library, if this build supplies one.
fn staged_shared_library(decl: &ImportDeclaration) -> Option<StagedRuntimePath> {
    if decl.system_provided() {
        return None;
    }
    decl.shared_library()
        .map(|shared| mangle(decl.label(), shared, decl.platform()))
}

/// The form used when linking dynamically: the interface stub if there is
/// one, otherwise the shared object itself.
fn shared_form(
    decl: &ImportDeclaration,
    staged: Option<&StagedRuntimePath>,
) -> Option<LibraryToLink> {
    if let Some(stub) = decl.interface_library() {
        return Some(LibraryToLink {
            artifact: stub.clone(),
            category: ArtifactCategory::InterfaceLibrary,
            staged: None,
        });
    }
    decl.shared_library().map(|shared| LibraryToLink {
        artifact: shared.clone(),
        category: ArtifactCategory::DynamicLibrary,
        staged: staged.cloned(),
    })
}

fn static_form(decl: &ImportDeclaration) -> Option<LibraryToLink> {
    decl.static_library().map(|archive| LibraryToLink {
        artifact: archive.clone(),
        category: if decl.always_link() {
            ArtifactCategory::AlwaysLinkStaticLibrary
        } else {
            ArtifactCategory::StaticLibrary
        },
        staged: None,
    })
}

fn select_for_mode(
    decl: &ImportDeclaration,
    staged: Option<&StagedRuntimePath>,
    mode: LinkingMode,
) -> LinkParams {
    // Dynamic linking wins unless static linking is explicitly requested;
    // shared_preferred does not change the outcome for a single import.
    let chosen = if mode.statically {
        static_form(decl).or_else(|| shared_form(decl, staged))
    } else {
        shared_form(decl, staged).or_else(|| static_form(decl))
    };

    let Some(library) = chosen else {
        return LinkParams::default();
    };

    let execution_dynamic_libraries = match (library.category.is_static(), staged) {
        (false, Some(path)) => vec![path.clone()],
        _ => Vec::new(),
    };

    LinkParams {
        libraries: vec![library],
        execution_dynamic_libraries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::validate::validate;
    use crate::core::import::ImportSpec;
    use crate::core::platform::{Platform, TargetOs};

    fn k8() -> Platform {
        Platform::new("k8", TargetOs::Linux)
    }

    fn import(pkg: &str) -> ImportSpec {
        ImportSpec::new(format!("//{}:foo", pkg).parse().unwrap())
    }

    fn file(pkg: &str, name: &str) -> LibraryArtifact {
        LibraryArtifact::source(format!("//{}:{}", pkg, name).parse().unwrap())
    }

    fn link_params(spec: ImportSpec) -> LinkParameterSet {
        let platform = k8();
        let decl = validate(spec, &platform).unwrap();
        select(&decl)
    }

    fn libraries(params: &LinkParams) -> Vec<String> {
        params.libraries.iter().map(|l| l.artifact.to_string()).collect()
    }

    fn runtime(params: &LinkParams) -> Vec<String> {
        params
            .execution_dynamic_libraries
            .iter()
            .map(|p| format!("bin {}", p))
            .collect()
    }

    #[test]
    fn test_linking_mode_indices_are_distinct() {
        let mut seen: Vec<usize> = LinkingMode::ALL.iter().map(|m| m.index()).collect();
        seen.sort();
        assert_eq!(seen, [0, 1, 2, 3]);
    }

    #[test]
    fn test_static_library_only() {
        let set = link_params(import("a").with_static(file("a", "libfoo.a")));

        for (_, params) in set.iter() {
            assert_eq!(libraries(params), ["src a/libfoo.a"]);
            assert_eq!(params.libraries[0].category, ArtifactCategory::StaticLibrary);
            assert!(params.execution_dynamic_libraries.is_empty());
        }
    }

    #[test]
    fn test_always_link_static_library() {
        let set = link_params(
            import("a")
                .with_static(file("a", "libfoo.a"))
                .with_always_link(true),
        );

        for (_, params) in set.iter() {
            assert_eq!(
                params.libraries[0].category,
                ArtifactCategory::AlwaysLinkStaticLibrary
            );
        }
    }

    #[test]
    fn test_shared_library_only() {
        let set = link_params(import("a").with_shared(file("a", "libfoo.so")));

        for (_, params) in set.iter() {
            assert_eq!(libraries(params), ["src a/libfoo.so"]);
            assert_eq!(params.libraries[0].category, ArtifactCategory::DynamicLibrary);
            assert_eq!(runtime(params), ["bin _solib_k8/_U_S_Sa_Cfoo___Ua/libfoo.so"]);
            assert_eq!(
                params.libraries[0].staged.as_ref(),
                params.execution_dynamic_libraries.first()
            );
        }
    }

    #[test]
    fn test_interface_and_shared_library() {
        let set = link_params(
            import("b")
                .with_shared(file("b", "libfoo.so"))
                .with_interface(file("b", "libfoo.ifso")),
        );

        for (_, params) in set.iter() {
            assert_eq!(libraries(params), ["src b/libfoo.ifso"]);
            assert_eq!(params.libraries[0].category, ArtifactCategory::InterfaceLibrary);
            assert!(params.libraries[0].staged.is_none());
            assert_eq!(runtime(params), ["bin _solib_k8/_U_S_Sb_Cfoo___Ub/libfoo.so"]);
        }
    }

    #[test]
    fn test_static_and_shared_libraries() {
        let set = link_params(
            import("a")
                .with_static(file("a", "libfoo.a"))
                .with_shared(file("a", "libfoo.so")),
        );

        for shared_preferred in [false, true] {
            let dynamic = set.get(false, shared_preferred);
            assert_eq!(libraries(dynamic), ["src a/libfoo.so"]);
            assert_eq!(runtime(dynamic), ["bin _solib_k8/_U_S_Sa_Cfoo___Ua/libfoo.so"]);

            let fixed = set.get(true, shared_preferred);
            assert_eq!(libraries(fixed), ["src a/libfoo.a"]);
            assert!(fixed.execution_dynamic_libraries.is_empty());
        }
    }

    #[test]
    fn test_always_link_has_no_effect_on_shared_form() {
        let set = link_params(
            import("a")
                .with_static(file("a", "libfoo.a"))
                .with_shared(file("a", "libfoo.so"))
                .with_always_link(true),
        );

        assert_eq!(
            set.get(false, false).libraries[0].category,
            ArtifactCategory::DynamicLibrary
        );
        assert_eq!(
            set.get(true, false).libraries[0].category,
            ArtifactCategory::AlwaysLinkStaticLibrary
        );
    }

    #[test]
    fn test_system_provided_interface_library() {
        let set = link_params(
            import("a")
                .with_interface(file("a", "libfoo.ifso"))
                .with_system_provided(true),
        );

        for (_, params) in set.iter() {
            assert_eq!(libraries(params), ["src a/libfoo.ifso"]);
            assert!(params.execution_dynamic_libraries.is_empty());
        }
    }

    #[test]
    fn test_header_only_import_links_nothing() {
        let set = link_params(import("a"));
        for (_, params) in set.iter() {
            assert!(params.is_empty());
        }
    }

    #[test]
    fn test_at_most_one_library_per_mode() {
        let set = link_params(
            import("a")
                .with_static(file("a", "libfoo.a"))
                .with_shared(file("a", "libfoo.so"))
                .with_interface(file("a", "libfoo.ifso")),
        );

        for (_, params) in set.iter() {
            assert_eq!(params.libraries.len(), 1);
            assert!(params.execution_dynamic_libraries.len() <= 1);
        }
    }

    #[test]
    fn test_select_is_idempotent() {
        let platform = k8();
        let decl = validate(
            import("a")
                .with_static(file("a", "libfoo.a"))
                .with_shared(file("a", "libfoo.so")),
            &platform,
        )
        .unwrap();

        assert_eq!(select(&decl), select(&decl));
    }

    #[test]
    fn test_system_provided_static_and_interface_library() {
        let set = link_params(
            import("a")
                .with_static(file("a", "libfoo.a"))
                .with_interface(file("a", "libfoo.ifso"))
                .with_system_provided(true),
        );

        for shared_preferred in [false, true] {
            let dynamic = set.get(false, shared_preferred);
            assert_eq!(libraries(dynamic), ["src a/libfoo.ifso"]);
            assert_eq!(dynamic.libraries[0].category, ArtifactCategory::InterfaceLibrary);
            assert!(dynamic.execution_dynamic_libraries.is_empty());

            let fixed = set.get(true, shared_preferred);
            assert_eq!(libraries(fixed), ["src a/libfoo.a"]);
            assert!(fixed.execution_dynamic_libraries.is_empty());
        }
    }

    #[test]
    fn test_windows_dll_with_import_library() {
        let windows = Platform::new("x64_windows", TargetOs::Windows);
        let decl = validate(
            import("a")
                .with_shared(file("a", "foo.dll"))
                .with_interface(file("a", "foo.lib")),
            &windows,
        )
        .unwrap();
        let set = select(&decl);

        for (_, params) in set.iter() {
            assert_eq!(libraries(params), ["src a/foo.lib"]);
            assert_eq!(params.libraries[0].category, ArtifactCategory::InterfaceLibrary);
            assert_eq!(
                runtime(params),
                ["bin _solib_x64_windows/_U_S_Sa_Cfoo___Ua/foo.dll"]
            );
        }
    }

    #[test]
    fn test_select_uses_validated_platform() {
        let spec = import("a").with_shared(file("a", "foo.dll"));
        let windows = Platform::new("x64_windows", TargetOs::Windows);
        assert!(validate(spec.clone(), &windows).is_err());

        let decl = validate(spec, &k8()).unwrap();
        assert_eq!(decl.platform(), &k8());
        for (_, params) in select(&decl).iter() {
            assert_eq!(libraries(params), ["src a/foo.dll"]);
            assert_eq!(runtime(params), ["bin _solib_k8/_U_S_Sa_Cfoo___Ua/foo.dll"]);
        }
    }
}
