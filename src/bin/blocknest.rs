use blocknest::{
    BlockType, ContentState, EditorCommand, EditorState, Entity, NestedPolicy, PolicyConfig,
    SelectionState, TabEvent, config,
};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "blocknest")]
#[command(about = "Interactive driver for the nested rich-text editing policy", long_about = None)]
struct Args {
    /// Policy config file (default: the per-user config path)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum list nesting depth, overriding the config
    #[arg(long = "max-depth", value_name = "N")]
    max_depth: Option<usize>,
}

fn load_policy(args: &Args) -> PolicyConfig {
    let path = args.config.clone().or_else(config::config_file_path);
    let mut loaded = path
        .as_deref()
        .filter(|p| p.exists())
        .and_then(config::load_config)
        .unwrap_or_default();
    if let Some(max_depth) = args.max_depth {
        loaded.max_list_depth = max_depth;
    }
    loaded
}

fn print_help() {
    println!("commands:");
    println!("  type <text>      insert text at the caret");
    println!("  newline          insert a soft newline");
    println!("  bold | italic | underline | code");
    println!("  backspace | delete");
    println!("  block <type>     toggle a block type (e.g. blockquote)");
    println!("  link <url>       link the selected characters to a URL");
    println!("  tab | shift-tab  adjust list depth");
    println!("  select <key> <start> <end>   set a range selection");
    println!("  caret <key> <offset>         collapse the selection");
    println!("  show             print the document tree");
    println!("  quit");
}

fn show(state: &EditorState) {
    let content = state.content();
    print!("{content}");
    for key in content.document_order() {
        let Some(block) = content.block(key) else {
            continue;
        };
        for (entity, range) in block.entity_ranges() {
            if let Some(url) = content.entity(entity).and_then(|e| e.data.get("url")) {
                println!("  link in [{key}] {}..{}: {url}", range.start, range.end);
            }
        }
    }
    let sel = state.selection();
    println!(
        "selection: [{}]{}..[{}]{}{}",
        sel.anchor_key,
        sel.anchor_offset,
        sel.focus_key,
        sel.focus_offset,
        if sel.backward { " (backward)" } else { "" }
    );
}

fn main() {
    let args = Args::parse();
    let config = load_policy(&args);
    let max_depth = config.max_list_depth;
    let policy = NestedPolicy::new(config);

    let mut state = EditorState::new(ContentState::from_text("Hello, blocknest"));
    println!("blocknest demo editor; 'help' lists commands");
    show(&state);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));

        match verb {
            "" => continue,
            "quit" | "exit" => break,
            "help" => print_help(),
            "show" => show(&state),
            "type" => {
                let style = state.current_inline_style();
                match blocknest::modifier::insert_text(
                    state.content(),
                    state.selection(),
                    rest,
                    style,
                    None,
                ) {
                    Some(content) => {
                        state = EditorState::push(
                            &state,
                            content,
                            blocknest::ChangeType::InsertCharacters,
                        );
                        show(&state);
                    }
                    None => println!("(cannot insert here)"),
                }
            }
            "newline" => {
                state = policy.insert_soft_newline(&state);
                show(&state);
            }
            "block" => {
                state = policy.toggle_block_type(&state, BlockType::from(rest.to_string()));
                show(&state);
            }
            "link" => {
                if rest.is_empty() {
                    println!("usage: link <url>");
                } else {
                    let mut content = state.content().clone();
                    let entity = content.create_entity(Entity::link(rest));
                    let target = *state.selection();
                    let with_entity =
                        EditorState::push(&state, content, blocknest::ChangeType::ApplyEntity);
                    state = policy.toggle_link(&with_entity, &target, Some(entity));
                    show(&state);
                }
            }
            "tab" | "shift-tab" => {
                let mut event = TabEvent::new(verb == "shift-tab");
                state = policy.on_tab(&mut event, &state, max_depth);
                if !event.is_default_prevented() {
                    println!("(tab not intercepted)");
                }
                show(&state);
            }
            "select" => {
                let parts: Vec<usize> =
                    rest.split_whitespace().filter_map(|p| p.parse().ok()).collect();
                if let [key, start, end] = parts[..] {
                    state = EditorState::force_selection(
                        &state,
                        SelectionState::range(key, start, key, end),
                    );
                    show(&state);
                } else {
                    println!("usage: select <key> <start> <end>");
                }
            }
            "caret" => {
                let parts: Vec<usize> =
                    rest.split_whitespace().filter_map(|p| p.parse().ok()).collect();
                if let [key, offset] = parts[..] {
                    state = EditorState::force_selection(
                        &state,
                        SelectionState::collapsed(key, offset),
                    );
                    show(&state);
                } else {
                    println!("usage: caret <key> <offset>");
                }
            }
            name => match policy.handle_key_command(&state, &EditorCommand::from_name(name)) {
                Some(next) => {
                    state = next;
                    show(&state);
                }
                None => println!("(not handled: {name})"),
            },
        }
    }
}
