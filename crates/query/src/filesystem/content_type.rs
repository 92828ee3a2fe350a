use std::path::Path;

const ROOT: &[&str] = &["public.data", "public.item", "public.content"];
const TEXT: &[&str] = &["public.text", "public.data", "public.item", "public.content"];
const PLAIN_TEXT: &[&str] = &[
    "public.plain-text",
    "public.text",
    "public.data",
    "public.item",
    "public.content",
];
const SOURCE: &[&str] = &[
    "public.source-code",
    "public.plain-text",
    "public.text",
    "public.data",
    "public.item",
    "public.content",
];
const SCRIPT: &[&str] = &[
    "public.script",
    "public.source-code",
    "public.plain-text",
    "public.text",
    "public.data",
    "public.item",
    "public.content",
];
const IMAGE: &[&str] = &["public.image", "public.data", "public.item", "public.content"];
const MOVIE: &[&str] = &[
    "public.movie",
    "public.audiovisual-content",
    "public.data",
    "public.item",
    "public.content",
];
const AUDIO: &[&str] = &[
    "public.audio",
    "public.audiovisual-content",
    "public.data",
    "public.item",
    "public.content",
];
const COMPOSITE: &[&str] = &[
    "public.composite-content",
    "public.data",
    "public.item",
    "public.content",
];
const FOLDER: &[&str] = &["public.folder", "public.directory", "public.item"];

/// Extension → (leaf identifier, ancestors)
const EXTENSIONS: &[(&[&str], &str, &[&str])] = &[
    // code
    (&["rs"], "org.rust-lang.rust-source", SOURCE),
    (&["c"], "public.c-source", SOURCE),
    (&["h"], "public.c-header", SOURCE),
    (&["cc", "cpp", "cxx"], "public.c-plus-plus-source", SOURCE),
    (&["hh", "hpp", "hxx"], "public.c-plus-plus-header", SOURCE),
    (&["m"], "public.objective-c-source", SOURCE),
    (&["swift"], "public.swift-source", SOURCE),
    (&["go"], "org.golang.go-source", SOURCE),
    (&["java"], "com.sun.java-source", SOURCE),
    (&["kt"], "org.kotlinlang.kotlin-source", SOURCE),
    (&["js", "mjs"], "com.netscape.javascript-source", SOURCE),
    (&["ts", "tsx"], "com.microsoft.typescript", SOURCE),
    (&["py"], "public.python-script", SCRIPT),
    (&["rb"], "public.ruby-script", SCRIPT),
    (&["pl"], "public.perl-script", SCRIPT),
    (&["php"], "public.php-script", SCRIPT),
    (&["sh", "bash", "zsh"], "public.shell-script", SCRIPT),
    // text
    (&["txt", "text", "log"], "public.plain-text", TEXT),
    (&["md", "markdown"], "net.daringfireball.markdown", PLAIN_TEXT),
    (&["csv"], "public.comma-separated-values-text", PLAIN_TEXT),
    (&["json"], "public.json", TEXT),
    (&["xml"], "public.xml", TEXT),
    (&["yaml", "yml"], "public.yaml", PLAIN_TEXT),
    (&["toml"], "public.toml", PLAIN_TEXT),
    (&["html", "htm"], "public.html", TEXT),
    // images
    (&["png"], "public.png", IMAGE),
    (&["jpg", "jpeg"], "public.jpeg", IMAGE),
    (&["gif"], "com.compuserve.gif", IMAGE),
    (&["heic"], "public.heic", IMAGE),
    (&["tif", "tiff"], "public.tiff", IMAGE),
    (&["bmp"], "com.microsoft.bmp", IMAGE),
    (&["webp"], "org.webmproject.webp", IMAGE),
    (&["svg"], "public.svg-image", IMAGE),
    // video
    (&["mp4"], "public.mpeg-4", MOVIE),
    (&["mov"], "com.apple.quicktime-movie", MOVIE),
    (&["m4v"], "com.apple.m4v-video", MOVIE),
    (&["avi"], "public.avi", MOVIE),
    (&["mkv"], "org.matroska.mkv", MOVIE),
    // audio
    (&["mp3"], "public.mp3", AUDIO),
    (&["m4a"], "com.apple.m4a-audio", AUDIO),
    (&["wav"], "com.microsoft.waveform-audio", AUDIO),
    (&["aif", "aiff"], "public.aiff-audio", AUDIO),
    (&["flac"], "org.xiph.flac", AUDIO),
    (&["aac"], "public.aac-audio", AUDIO),
    // documents
    (&["pdf"], "com.adobe.pdf", COMPOSITE),
];

/// Synthesized uniform type information for a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ContentType {
    identifier: &'static str,
    ancestors: &'static [&'static str],
}

impl ContentType {
    pub(crate) fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Leaf identifier followed by every ancestor, without duplicates
    pub(crate) fn tree(&self) -> Vec<&'static str> {
        let mut tree = vec![self.identifier];
        for ancestor in self.ancestors {
            if !tree.contains(ancestor) {
                tree.push(ancestor);
            }
        }
        tree
    }
}

pub(crate) fn for_path(path: &Path, is_dir: bool) -> ContentType {
    if is_dir {
        return ContentType {
            identifier: "public.folder",
            ancestors: FOLDER,
        };
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    extension
        .and_then(|ext| {
            EXTENSIONS
                .iter()
                .find(|(exts, _, _)| exts.contains(&ext.as_str()))
        })
        .map(|(_, identifier, ancestors)| ContentType {
            identifier: *identifier,
            ancestors: *ancestors,
        })
        .unwrap_or(ContentType {
            identifier: "public.data",
            ancestors: ROOT,
        })
}
