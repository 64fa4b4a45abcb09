use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use chrono::Utc;

fn main() {
    // Define the output path for the version.rs file
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = PathBuf::from(out_dir).join("version.rs");

    // Empty when git is missing or this is not a checkout
    fn run_command(args: &[&str]) -> String {
        Command::new(args[0])
            .args(&args[1..])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .unwrap_or_default()
    }

    let git_repo = run_command(&["git", "remote", "get-url", "origin"]);
    let git_hash = run_command(&["git", "log", "-1", "--pretty=format:%H"]);
    let git_author = run_command(&["git", "log", "-1", "--pretty=format:%an <%ae>"]);
    let git_branch = run_command(&["git", "branch", "--show-current"]);
    let git_tag = run_command(&["git", "describe", "--tags", "--abbrev=1"]);
    let git_commit_date = run_command(&["git", "log", "-1", "--pretty=format:%as"]);
    let git_is_dirty = run_command(&["git", "diff", "--shortstat"]);
    let build_date = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let git_is_dirty = if git_is_dirty.is_empty() {
        "clean"
    } else {
        "dirty"
    };

    let consts = [
        ("GIT_REPO", git_repo.as_str()),
        ("GIT_HASH", git_hash.as_str()),
        ("GIT_AUTHOR", git_author.as_str()),
        ("GIT_BRANCH", git_branch.as_str()),
        ("GIT_TAG", git_tag.as_str()),
        ("GIT_COMMIT_DATE", git_commit_date.as_str()),
        ("GIT_IS_DIRTY", git_is_dirty),
        ("BUILD_DATE", build_date.as_str()),
    ];
    let source: String = consts
        .iter()
        .map(|(name, value)| format!("#[allow(dead_code)]\npub const {}: &str = {:?};\n", name, value))
        .collect();

    fs::write(&dest_path, source).unwrap();
    println!("cargo:rerun-if-changed=.git/HEAD");
}
