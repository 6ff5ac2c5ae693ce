//! Image reference extraction from rendered manifests.
//!
//! A deliberately simple line scan: any line containing `image: ` is
//! assumed to name a container image. This matches what chart authors
//! actually emit and avoids parsing the full manifest structure.

use tracing::debug;

/// Marker that identifies an image reference line in rendered YAML.
const IMAGE_MARKER: &str = "image: ";

/// Extract the unique container image references from rendered manifest
/// text, preserving first-seen order.
///
/// The value after the first `image: ` on each line is trimmed of
/// whitespace and surrounding quotes. Duplicates (exact string match)
/// are dropped; empty values are skipped.
pub fn extract_images(manifest: &str) -> Vec<String> {
    let mut images: Vec<String> = Vec::new();

    for line in manifest.lines() {
        let Some(idx) = line.find(IMAGE_MARKER) else {
            continue;
        };
        let image = line[idx + IMAGE_MARKER.len()..]
            .trim()
            .trim_matches(|c| c == '"' || c == '\'');
        if image.is_empty() {
            continue;
        }
        if images.iter().any(|seen| seen == image) {
            continue;
        }
        debug!("found image {image}");
        images.push(image.to_string());
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_deduplicates() {
        let manifest = "\
apiVersion: v1
kind: Pod
spec:
  containers:
    - image: \"nginx:1.25\"
    - image: \"nginx:1.25\"
    - image: redis:7
";
        assert_eq!(extract_images(manifest), vec!["nginx:1.25", "redis:7"]);
    }

    #[test]
    fn preserves_first_seen_order() {
        let manifest = "image: c\nimage: a\nimage: b\nimage: a\nimage: c\n";
        assert_eq!(extract_images(manifest), vec!["c", "a", "b"]);
    }

    #[test]
    fn strips_single_and_double_quotes() {
        let manifest = "  image: 'quay.io/app:v2'\n  image: \"quay.io/db:v1\"\n";
        assert_eq!(
            extract_images(manifest),
            vec!["quay.io/app:v2", "quay.io/db:v1"]
        );
    }

    #[test]
    fn handles_indented_and_inline_list_lines() {
        let manifest = "      - image: registry.example.com/team/app:1.0.0\n";
        assert_eq!(
            extract_images(manifest),
            vec!["registry.example.com/team/app:1.0.0"]
        );
    }

    #[test]
    fn no_marker_yields_empty_list() {
        assert!(extract_images("kind: Service\nmetadata:\n  name: web\n").is_empty());
        assert!(extract_images("").is_empty());
    }

    #[test]
    fn bare_image_key_is_skipped() {
        // `image:` with no value renders as an empty string after the
        // marker; it must not produce an empty image reference.
        assert!(extract_images("image: \nimage: \"\"\n").is_empty());
    }
}
