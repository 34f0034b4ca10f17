use std::path::{Component, Path, PathBuf};

use glob::Pattern;

use super::RecipeError;

/// Copies files whose name matches `pattern` from under `src` into `dst`.
#[derive(Debug, Clone)]
pub struct CopyRule {
  pattern: Pattern,
  src: Option<PathBuf>,
  dst: PathBuf,
  keep_path: bool,
}

impl CopyRule {
  pub fn new(pattern: &str, src: Option<&str>, dst: &str, keep_path: bool) -> Result<Self, RecipeError> {
    Ok(Self {
      pattern: Pattern::new(pattern)?,
      src: src.map(PathBuf::from),
      dst: PathBuf::from(dst),
      keep_path,
    })
  }

  pub fn pattern(&self) -> &str {
    self.pattern.as_str()
  }

  /// Package path for `rel` (relative to the build folder), if this rule takes it.
  fn destination(&self, rel: &Path) -> Option<PathBuf> {
    let file_name = rel.file_name()?.to_str()?;
    if !self.pattern.matches(file_name) {
      return None;
    }
    let inner = match &self.src {
      Some(src) => rel.strip_prefix(src).ok()?,
      None => rel,
    };
    if self.keep_path {
      Some(self.dst.join(inner))
    } else {
      Some(self.dst.join(file_name))
    }
  }
}

/// Ordered copy rules mapping build artifacts into the package folder.
#[derive(Debug, Clone)]
pub struct PackageLayout {
  rules: Vec<CopyRule>,
}

impl PackageLayout {
  pub fn new(rules: Vec<CopyRule>) -> Self {
    Self { rules }
  }

  /// Headers keep their tree under `include`; libraries are flattened.
  pub fn network() -> Result<Self, RecipeError> {
    Ok(Self::new(vec![
      CopyRule::new("*.h", Some("include"), "include", true)?,
      CopyRule::new("*.hpp", Some("include"), "include", true)?,
      CopyRule::new("*.ipp", Some("include"), "include", true)?,
      CopyRule::new("*.lib", None, "lib", false)?,
      CopyRule::new("*.dll", None, "bin", false)?,
      CopyRule::new("*.dylib*", None, "lib", false)?,
      CopyRule::new("*.so", None, "lib", false)?,
      CopyRule::new("*.a", None, "lib", false)?,
    ]))
  }

  pub fn rules(&self) -> &[CopyRule] {
    &self.rules
  }

  /// Where `rel` lands in the package, by the first matching rule.
  ///
  /// Absolute paths and paths escaping the build folder never match.
  pub fn destination_for(&self, rel: &Path) -> Option<PathBuf> {
    let escapes = rel
      .components()
      .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
      return None;
    }
    self.rules.iter().find_map(|rule| rule.destination(rel))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn layout() -> PackageLayout {
    PackageLayout::network().unwrap()
  }

  #[test]
  fn headers_keep_their_tree() {
    assert_eq!(
      layout().destination_for(Path::new("include/kth/network/p2p.hpp")),
      Some(PathBuf::from("include/kth/network/p2p.hpp"))
    );
    assert_eq!(
      layout().destination_for(Path::new("include/kth/network/impl/channel.ipp")),
      Some(PathBuf::from("include/kth/network/impl/channel.ipp"))
    );
  }

  #[test]
  fn headers_outside_include_are_ignored() {
    assert_eq!(layout().destination_for(Path::new("src/protocols/protocol.hpp")), None);
  }

  #[test]
  fn libraries_are_flattened() {
    assert_eq!(
      layout().destination_for(Path::new("build/lib/libnetwork.a")),
      Some(PathBuf::from("lib/libnetwork.a"))
    );
    assert_eq!(
      layout().destination_for(Path::new("build/Release/network.dll")),
      Some(PathBuf::from("bin/network.dll"))
    );
    assert_eq!(
      layout().destination_for(Path::new("out/libnetwork.0.1.dylib")),
      Some(PathBuf::from("lib/libnetwork.0.1.dylib"))
    );
  }

  #[test]
  fn sources_and_escapes_do_not_match() {
    assert_eq!(layout().destination_for(Path::new("src/p2p.cpp")), None);
    assert_eq!(layout().destination_for(Path::new("../libnetwork.a")), None);
    assert_eq!(layout().destination_for(Path::new("/usr/lib/libnetwork.a")), None);
  }
}
