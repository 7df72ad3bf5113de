//! Command-line driver for the tomita pipeline.
//!
//! This binary is a thin wrapper: it reads a grammar or a compiled
//! persisted form, calls into `tomita`/`tomita-core`, and prints the
//! result. All parsing/unification/translation logic lives in the
//! library crates; nothing here re-implements pipeline behavior.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use tomita::{
    compile, enumerate, recognize, translate, unify_upward, Candidate, CompiledGrammar, GrammarConfig,
    IdentityPostProcessor, Rule, RuleStore, Token, Trie,
};
use tomita_core::{load_compiled, save_compiled};

#[derive(Parser)]
#[command(name = "tomita")]
#[command(about = "GLR parser with bidirectional translation and feature unification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a grammar document into a persisted, serialized form.
    ///
    /// The grammar document is a JSON array of rule records (§6's "Rule
    /// record format" boundary) with rule 0 being the augmented start
    /// rule.
    Compile {
        /// Path to the grammar JSON document.
        grammar: PathBuf,

        /// Path to write the persisted compiled grammar.
        #[arg(short = 'o', long)]
        output: PathBuf,
    },

    /// Parse a sentence read from stdin against a compiled grammar,
    /// printing every surviving `(translation, cost)` pair ascending
    /// by cost, one per line.
    Parse {
        /// Path to a compiled grammar produced by `tomita compile`.
        compiled: PathBuf,
    },

    /// Print exit-level observables for a compiled grammar: rule count,
    /// state count, symbol count, nonterminal count (§6).
    Tables {
        /// Path to a compiled grammar produced by `tomita compile`.
        compiled: PathBuf,
    },
}

#[derive(Deserialize)]
struct GrammarDocument {
    rules: Vec<Rule>,
}

/// Folds multi-token, terminal-only rules into the phrase trie (§4.1),
/// leaving single-token and nonterminal-bearing rules on the DFA-visible
/// path. Only runs when `auto_dict` is set.
fn build_auto_trie(rules: &[Rule], auto_dict: bool) -> Trie {
    let mut trie = Trie::new();
    if !auto_dict {
        return trie;
    }
    for (idx, rule) in rules.iter().enumerate() {
        if rule.left.len() > 1 && rule.left.iter().all(|s| s.is_terminal()) {
            let phrase: Vec<Token> = rule.left.iter().map(|s| Token::from(s.as_str())).collect();
            trie.insert(&phrase, tomita_runtime::RuleId::from(idx));
        }
    }
    trie
}

fn run_compile(grammar_path: PathBuf, output: PathBuf) -> Result<(), String> {
    let text = fs::read_to_string(&grammar_path)
        .map_err(|e| format!("failed to read {}: {e}", grammar_path.display()))?;
    let doc: GrammarDocument =
        serde_json::from_str(&text).map_err(|e| format!("invalid grammar document: {e}"))?;

    let config = GrammarConfig::default();
    let trie = build_auto_trie(&doc.rules, config.auto_dict);
    let store = RuleStore::new(doc.rules, trie).map_err(|e| e.to_string())?;
    let grammar = compile(store, config).map_err(|e| e.to_string())?;
    let bytes = save_compiled(&grammar).map_err(|e| e.to_string())?;

    fs::write(&output, bytes).map_err(|e| format!("failed to write {}: {e}", output.display()))?;
    log::info!("wrote compiled grammar to {}", output.display());
    Ok(())
}

fn load_grammar(path: &PathBuf) -> Result<CompiledGrammar, String> {
    let bytes = fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    load_compiled(&bytes).map_err(|e| e.to_string())
}

fn run_parse(compiled: PathBuf) -> Result<(), String> {
    let grammar = load_grammar(&compiled)?;

    let mut line = String::new();
    io::stdin()
        .read_to_string(&mut line)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    let tokens: Vec<Token> = line.split_whitespace().map(Token::from).collect();

    let state = recognize(&grammar, &tokens).map_err(|e| e.to_string())?;
    let forest = tomita::build_forest(&state, &grammar).map_err(|e| e.to_string())?;
    let unified = unify_upward(&forest, &grammar).map_err(|e| e.to_string())?;
    let translated = translate(&unified, &grammar).map_err(|e| e.to_string())?;

    // `enumerate` is a lazy sequence (C7); this driver wants every
    // surviving candidate ranked by cost, so it collects and sorts here
    // itself, the same as `parser.py: trans_sent` does at its own call
    // site after its `tree3.enumx()`.
    let mut results: Vec<Candidate> = Vec::new();
    for item in enumerate(&translated, &grammar, &IdentityPostProcessor) {
        results.push(item.map_err(|e| e.to_string())?);
    }
    results.sort_by_key(|c| c.cost);

    for candidate in results {
        println!("{}\t{}", candidate.text, candidate.cost);
    }
    Ok(())
}

fn run_tables(compiled: PathBuf) -> Result<(), String> {
    let grammar = load_grammar(&compiled)?;
    let symbols: std::collections::BTreeSet<_> = grammar
        .store
        .iter()
        .flat_map(|(_, rule)| rule.left.iter().cloned())
        .collect();
    let nonterminals = symbols.iter().filter(|s| s.is_nonterminal()).count();

    println!("rule count: {}", grammar.store.rule_count());
    println!("state count: {}", grammar.dfa.states.len());
    println!("symbol count: {}", symbols.len());
    println!("nonterminal count: {nonterminals}");
    Ok(())
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Compile { grammar, output } => run_compile(grammar, output),
        Commands::Parse { compiled } => run_parse(compiled),
        Commands::Tables { compiled } => run_tables(compiled),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
