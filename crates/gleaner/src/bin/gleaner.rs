// ABOUTME: CLI binary for the gleaner extraction pipeline.
// ABOUTME: Selects nodes from fetched URLs or local HTML files and prints text/attribute/table extractions.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use gleaner::{extract, normalize, Document, Extraction, Loader, Selector};

#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(about = "Select nodes from HTML documents and extract text, attributes, or tables")]
struct Args {
    /// CSS selector applied to each document
    #[arg(short = 's', long = "select")]
    select: String,

    /// Only extract from the first match per document
    #[arg(long = "first")]
    first: bool,

    /// Extract a single named attribute instead of text
    #[arg(short = 'a', long = "attr", value_name = "NAME")]
    attr: Option<String>,

    /// Extract all attributes of each match
    #[arg(long = "attrs")]
    attrs: bool,

    /// Extract the first table under each match
    #[arg(long = "table")]
    table: bool,

    /// Apply the default normalization rules to text output
    #[arg(short = 'n', long = "normalize")]
    normalize: bool,

    /// Output extractions as JSON instead of plain lines
    #[arg(long = "json")]
    json: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Local HTML file to parse instead of fetching
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Base URL recorded for --html file mode, so relative links resolve
    #[arg(long = "url", value_name = "URL")]
    url: Option<String>,

    /// Follow next-page links, extracting from up to N pages per URL
    #[arg(long = "follow-next", value_name = "N")]
    follow_next: Option<usize>,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// URLs to fetch and extract from
    #[arg()]
    urls: Vec<String>,
}

/// Extract from every selected node of one document according to the flags.
///
/// Table errors propagate to the exit code via `had_error`, matching every
/// other failure path in this binary.
fn extract_from(
    doc: &Document,
    selector: &Selector,
    args: &Args,
    had_error: &mut bool,
) -> Vec<Extraction> {
    let nodes = if args.first {
        doc.select_first(selector).into_iter().collect()
    } else {
        doc.select_all(selector)
    };

    let mut out = Vec::with_capacity(nodes.len());
    for node in &nodes {
        if let Some(name) = &args.attr {
            out.push(Extraction::Attribute(
                node.attribute(name).map(|v| v.to_string()),
            ));
        } else if args.attrs {
            out.push(Extraction::Attributes(node.attributes()));
        } else if args.table {
            match extract::table(node) {
                Ok(grid) => out.push(Extraction::Table(grid)),
                Err(e) => {
                    eprintln!("error extracting table: {}", e);
                    *had_error = true;
                }
            }
        } else {
            let text = node.text();
            let text = if args.normalize {
                normalize(&text)
            } else {
                text
            };
            out.push(Extraction::Text(text));
        }
    }
    out
}

/// Render one extraction as plain output lines.
fn render_plain(extraction: &Extraction) -> String {
    match extraction {
        Extraction::Text(s) => s.clone(),
        Extraction::Attribute(Some(v)) => v.clone(),
        Extraction::Attribute(None) => String::new(),
        Extraction::Attributes(pairs) => pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" "),
        Extraction::Table(t) => t
            .rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn format_output(results: &[Extraction], json: bool) -> String {
    if json {
        serde_json::to_string_pretty(results).unwrap_or_else(|e| {
            eprintln!("error serializing output: {}", e);
            String::new()
        })
    } else {
        results
            .iter()
            .map(render_plain)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Validate args
    if args.html.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --html with a file");
        return ExitCode::from(1);
    }
    if args.html.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --html and positional URLs");
        return ExitCode::from(1);
    }
    if args.url.is_some() && args.html.is_none() {
        eprintln!("error: --url is only meaningful with --html");
        return ExitCode::from(1);
    }
    let kinds = [args.attr.is_some(), args.attrs, args.table];
    if kinds.iter().filter(|k| **k).count() > 1 {
        eprintln!("error: --attr, --attrs, and --table are mutually exclusive");
        return ExitCode::from(1);
    }

    let selector = match Selector::parse(&args.select) {
        Ok(sel) => sel,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let mut builder = Loader::builder();
    if let Some(n) = args.follow_next {
        builder = builder.max_pages(n);
    }
    let loader = builder.build();

    let start = Instant::now();
    let mut results: Vec<Extraction> = Vec::new();
    let mut had_error = false;

    if let Some(html_path) = &args.html {
        // Local file mode
        match fs::read_to_string(html_path) {
            Ok(markup) => {
                let parsed = match &args.url {
                    Some(base) => Document::parse_with_url(&markup, base),
                    None => Document::parse(&markup),
                };
                match parsed {
                    Ok(doc) => {
                        results.extend(extract_from(&doc, &selector, &args, &mut had_error))
                    }
                    Err(e) => {
                        eprintln!("error parsing {:?}: {}", html_path, e);
                        had_error = true;
                    }
                }
            }
            Err(e) => {
                eprintln!("error reading file {:?}: {}", html_path, e);
                had_error = true;
            }
        }
    } else {
        // Fetch mode; one URL's failure never aborts the others.
        for url in &args.urls {
            if args.follow_next.is_some() {
                let mut pages = loader.pages(url);
                loop {
                    match pages.try_next().await {
                        Ok(Some(doc)) => {
                            results.extend(extract_from(&doc, &selector, &args, &mut had_error))
                        }
                        Ok(None) => break,
                        Err(e) => {
                            eprintln!("error loading page of {}: {}", url, e);
                            had_error = true;
                            break;
                        }
                    }
                }
            } else {
                match loader.load(url).await {
                    Ok(doc) => {
                        results.extend(extract_from(&doc, &selector, &args, &mut had_error))
                    }
                    Err(e) => {
                        eprintln!("error loading {}: {}", url, e);
                        had_error = true;
                    }
                }
            }
        }
    }

    let elapsed = start.elapsed();

    if !results.is_empty() {
        let output_str = format_output(&results, args.json);
        if let Some(output_path) = &args.output {
            if let Err(e) = fs::write(output_path, &output_str) {
                eprintln!("error writing to {:?}: {}", output_path, e);
                had_error = true;
            }
        } else {
            println!("{}", output_str);
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
