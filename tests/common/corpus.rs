//! Corpus and summary fixtures
//!
//! Small hand-written corpora covering each line grammar, plus helpers that
//! write them into a temporary workspace for pipeline runs.

use std::path::PathBuf;
use tempfile::TempDir;

/// Trailing-reference lines, the form of the full-text Bible source.
pub const TRAILING_CORPUS: &str = "\
In the beginning God created the heavens and the earth. -- genesis 1:1
And the earth was formless and void, and darkness was over the surface of the deep. -- genesis 1:2
.
Then the LORD God formed man of dust from the ground. -- genesis 2:7
The LORD God planted a garden toward the east, in Eden. -- genesis 2:8
Now there was a man of the Pharisees, named Nicodemus. -- john 3:1
For God so loved the world, that He gave His only begotten Son. -- john 3:16
";

/// Leading-reference lines interleaved with a continuation line.
pub const LEADING_CORPUS: &str = "\
Psalms 23:1 The LORD is my shepherd, I shall not want.
Psalms 23:2 He makes me lie down in green pastures;
He leads me beside quiet waters.
Psalms 24:1 The earth is the LORD's, and all it contains.
";

/// Chapter headers followed by untagged verse text.
pub const HEADER_CORPUS: &str = "\
Ruth Chapter 1
Now it came about in the days when the judges governed, that there was a famine in the land.
And a certain man of Bethlehem in Judah went to sojourn in the land of Moab.
Ruth 2
Now Naomi had a kinsman of her husband.
";

pub const SUMMARIES_JSON: &str = r#"{
  "Genesis 1": "God creates heavens, earth, life",
  "Genesis 2": "God forms man, plants Eden",
  "John 3": "Jesus teaches Nicodemus rebirth",
  "Exodus 40": "Moses raises tabernacle"
}"#;

/// A temporary directory holding a corpus and a summaries file.
pub struct Workspace {
    pub dir: TempDir,
    pub corpus: PathBuf,
    pub summaries: PathBuf,
}

impl Workspace {
    pub fn new(corpus_text: &str, summaries_json: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let corpus = dir.path().join("bible.txt");
        let summaries = dir.path().join("summaries.json");
        std::fs::write(&corpus, corpus_text).expect("write corpus");
        std::fs::write(&summaries, summaries_json).expect("write summaries");
        Self { dir, corpus, summaries }
    }

    pub fn standard() -> Self {
        Self::new(TRAILING_CORPUS, SUMMARIES_JSON)
    }

    pub fn out(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
