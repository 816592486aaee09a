//! Resource id resolution
//!
//! N3 files reference other assets by resource id, e.g.
//! `msh:characters/hero.nvx2` or `tex:system/white`. The scheme selects a
//! directory under the export root:
//!
//! | Scheme | Directory  |
//! |--------|------------|
//! | `msh`  | `meshes`   |
//! | `tex`  | `textures` |
//! | `ani`  | `anims`    |
//! | `mdl`  | `models`   |
//! | `shd`  | `shaders`  |

use std::path::{Path, PathBuf};

const SCHEMES: &[(&str, &str)] = &[
    ("msh", "meshes"),
    ("tex", "textures"),
    ("ani", "anims"),
    ("mdl", "models"),
    ("shd", "shaders"),
];

/// Split `scheme:path`, if the id carries a known scheme
pub fn split_scheme(id: &str) -> Option<(&'static str, &str)> {
    let (scheme, rest) = id.split_once(':')?;
    SCHEMES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(scheme))
        .map(|&(_, dir)| (dir, rest))
}

/// Map a resource id to a path under `root`
///
/// Ids without a known scheme are taken relative to `root`. A mesh id without
/// an extension gets `.nvx2`.
pub fn resolve(root: &Path, id: &str) -> PathBuf {
    let (path, is_mesh) = match split_scheme(id) {
        Some((dir, rest)) => {
            let rest = rest.trim_start_matches('/');
            (root.join(dir).join(rest), dir == "meshes")
        }
        None => (root.join(id), false),
    };
    if is_mesh && path.extension().is_none() {
        path.with_extension("nvx2")
    } else {
        path
    }
}

/// Resolve a mesh id and check it exists on disk
pub fn find_mesh(root: Option<&Path>, id: &str) -> Option<PathBuf> {
    let path = resolve(root?, id);
    path.is_file().then_some(path)
}
