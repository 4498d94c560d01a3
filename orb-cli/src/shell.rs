// SPDX-License-Identifier: AGPL-3.0-or-later
//! Interactive browsing shell

use console::style;
use orb_core::{ObjectId, OrbError, OrbResult};
use orb_vfs::{templates, FilterConfig, SortConfig, SortKey, VfsEvent, VirtualFs};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::commands::{self, find_provider};
use crate::config::Config;

const HELP: &str = "\
ls                      show the current listing
cd <index|name|..>      enter a provider or directory
up                      leave the current directory
back / forward          move through history
goto <index>            jump to a breadcrumb (0 = provider list)
select <index>...       add entries to the selection
clear                   clear the selection
rm                      delete the selection (removes providers at the top level)
rename <name>           rename the selection
subst <from> <to>       rename the selection by substitution
mv <provider> <dir>     move the selection
mkdir <name>            create a directory
touch <name> [template] create a file (empty_file, markdown, python, csv)
open                    open the selection
cat <index>             print a file
filter all|default|dirs|hidden|links|ext [suffix...]
sort name|size|modified [asc|desc]
help                    this text
quit                    leave the shell";

/// Which part of the filter a `filter` command changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    All,
    Default,
    ToggleFoldersOnly,
    ToggleHidden,
    ToggleSymlinks,
    Suffixes(Vec<String>),
}

impl FilterChange {
    fn apply(self, mut filters: FilterConfig) -> FilterConfig {
        match self {
            FilterChange::All => return FilterConfig::show_all(),
            FilterChange::Default => return FilterConfig::default(),
            FilterChange::ToggleFoldersOnly => filters.folders_only = !filters.folders_only,
            FilterChange::ToggleHidden => filters.dot_files_hidden = !filters.dot_files_hidden,
            FilterChange::ToggleSymlinks => filters.symlinks_hidden = !filters.symlinks_hidden,
            FilterChange::Suffixes(suffixes) => filters.by_suffix = suffixes.into_iter().collect(),
        }
        filters
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Index(usize),
    Name(String),
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Ls,
    Cd(Target),
    Up,
    Back,
    Forward,
    Goto(usize),
    Select(Vec<usize>),
    Clear,
    Rm,
    Rename(String),
    Subst(String, String),
    Mv { provider: String, dir: String },
    Mkdir(String),
    Touch { name: String, template: Option<String> },
    Open,
    Cat(usize),
    Filter(FilterChange),
    Sort(SortConfig),
    Help,
    Quit,
}

fn usage(msg: &str) -> OrbError {
    OrbError::Other(format!("usage: {msg}"))
}

fn index(arg: Option<&str>, msg: &str) -> OrbResult<usize> {
    arg.and_then(|a| a.parse().ok()).ok_or_else(|| usage(msg))
}

fn one(args: &[&str], msg: &str) -> OrbResult<String> {
    match args {
        [arg] => Ok(arg.to_string()),
        _ => Err(usage(msg)),
    }
}

/// Parse one input line; blank lines yield `None`
pub fn parse(line: &str) -> OrbResult<Option<ShellCommand>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match name {
        "ls" => ShellCommand::Ls,
        "cd" => match args {
            [".."] => ShellCommand::Cd(Target::Parent),
            [arg] => match arg.parse() {
                Ok(i) => ShellCommand::Cd(Target::Index(i)),
                Err(_) => ShellCommand::Cd(Target::Name(arg.to_string())),
            },
            _ => return Err(usage("cd <index|name|..>")),
        },
        "up" => ShellCommand::Up,
        "back" => ShellCommand::Back,
        "forward" => ShellCommand::Forward,
        "goto" => ShellCommand::Goto(index(args.first().copied(), "goto <index>")?),
        "select" => {
            if args.is_empty() {
                return Err(usage("select <index>..."));
            }
            let indices = args
                .iter()
                .map(|a| a.parse().map_err(|_| usage("select <index>...")))
                .collect::<OrbResult<Vec<usize>>>()?;
            ShellCommand::Select(indices)
        }
        "clear" => ShellCommand::Clear,
        "rm" => ShellCommand::Rm,
        "rename" => ShellCommand::Rename(one(args, "rename <name>")?),
        "subst" => match args {
            [from, to] => ShellCommand::Subst(from.to_string(), to.to_string()),
            _ => return Err(usage("subst <from> <to>")),
        },
        "mv" => match args {
            [provider, dir] => ShellCommand::Mv {
                provider: provider.to_string(),
                dir: dir.to_string(),
            },
            _ => return Err(usage("mv <provider> <dir>")),
        },
        "mkdir" => ShellCommand::Mkdir(one(args, "mkdir <name>")?),
        "touch" => match args {
            [name] => ShellCommand::Touch {
                name: name.to_string(),
                template: None,
            },
            [name, template] => ShellCommand::Touch {
                name: name.to_string(),
                template: Some(template.to_string()),
            },
            _ => return Err(usage("touch <name> [template]")),
        },
        "open" => ShellCommand::Open,
        "cat" => ShellCommand::Cat(index(args.first().copied(), "cat <index>")?),
        "filter" => {
            let change = match args {
                ["all"] => FilterChange::All,
                ["default"] => FilterChange::Default,
                ["dirs"] => FilterChange::ToggleFoldersOnly,
                ["hidden"] => FilterChange::ToggleHidden,
                ["links"] => FilterChange::ToggleSymlinks,
                ["ext", suffixes @ ..] => {
                    FilterChange::Suffixes(suffixes.iter().map(|s| s.to_string()).collect())
                }
                _ => return Err(usage("filter all|default|dirs|hidden|links|ext [suffix...]")),
            };
            ShellCommand::Filter(change)
        }
        "sort" => {
            let (key, ascending) = match args {
                [key] => (key, true),
                [key, "asc"] => (key, true),
                [key, "desc"] => (key, false),
                _ => return Err(usage("sort name|size|modified [asc|desc]")),
            };
            ShellCommand::Sort(SortConfig::new(key.parse::<SortKey>()?, ascending))
        }
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(OrbError::Other(format!("unknown command: {other} (try help)"))),
    };
    Ok(Some(command))
}

fn prompt(vfs: &VirtualFs) -> String {
    let crumbs = vfs.path_as_array();
    match crumbs.split_first() {
        None => "providers> ".to_string(),
        Some((root, rest)) => {
            let path: Vec<&str> = rest.iter().map(|e| e.name.as_str()).collect();
            format!("{}:/{}> ", root.name, path.join("/"))
        }
    }
}

fn show(vfs: &VirtualFs) {
    let selected = vfs.selected_indices();
    if vfs.is_bound() {
        commands::print_files(&vfs.files(), &selected, true);
    } else {
        commands::print_providers(&vfs.providers(), &selected);
    }
}

/// Execute one command; returns false when the shell should exit
async fn execute(vfs: &VirtualFs, command: ShellCommand) -> OrbResult<bool> {
    match command {
        ShellCommand::Ls => show(vfs),
        ShellCommand::Cd(Target::Parent) | ShellCommand::Up => {
            if vfs.pop().await?.is_none() {
                println!("already at the provider root");
            }
            show(vfs);
        }
        ShellCommand::Cd(Target::Index(i)) => {
            vfs.enter(i).await?;
            show(vfs);
        }
        ShellCommand::Cd(Target::Name(name)) => {
            let position = if vfs.is_bound() {
                vfs.files().iter().position(|e| e.name == name)
            } else {
                vfs.providers().iter().position(|p| p.id == name)
            };
            let i = position.ok_or_else(|| OrbError::NotFound(name))?;
            vfs.enter(i).await?;
            show(vfs);
        }
        ShellCommand::Back => {
            if !vfs.go_back().await? {
                println!("nothing to go back to");
            }
            show(vfs);
        }
        ShellCommand::Forward => {
            if !vfs.go_forward().await? {
                println!("nothing to go forward to");
            }
            show(vfs);
        }
        ShellCommand::Goto(i) => {
            vfs.goto_index(i).await?;
            show(vfs);
        }
        ShellCommand::Select(indices) => {
            for i in indices {
                vfs.select_file(i);
            }
            show(vfs);
        }
        ShellCommand::Clear => {
            vfs.clear_selection();
        }
        ShellCommand::Rm => commands::print_report(&vfs.delete().await),
        ShellCommand::Rename(name) => commands::print_report(&vfs.rename(&name).await),
        ShellCommand::Subst(from, to) => {
            commands::print_report(&vfs.replace_in_names(&from, &to).await)
        }
        ShellCommand::Mv { provider, dir } => {
            let provider = find_provider(vfs, &provider)?;
            let dir = ObjectId::directory(dir);
            commands::print_report(&vfs.move_to(&dir, &provider).await);
        }
        ShellCommand::Mkdir(name) => {
            commands::print_report(&vfs.create_from_template(&templates::DIRECTORY, &name).await)
        }
        ShellCommand::Touch { name, template } => {
            let template = match template {
                Some(t) => templates::find(&t).ok_or_else(|| OrbError::NotFound(format!("template {t}")))?,
                None => &templates::EMPTY_FILE,
            };
            commands::print_report(&vfs.create_from_template(template, &name).await);
        }
        ShellCommand::Open => commands::print_report(&vfs.open().await),
        ShellCommand::Cat(i) => {
            let entry = vfs
                .files()
                .get(i)
                .cloned()
                .ok_or_else(|| OrbError::NotFound(format!("no entry at index {i}")))?;
            let content = vfs.read_file(&entry.id).await?;
            println!("{}", String::from_utf8_lossy(&content));
        }
        ShellCommand::Filter(change) => {
            vfs.set_filters(change.apply(vfs.filters())).await?;
            show(vfs);
        }
        ShellCommand::Sort(sort) => {
            vfs.set_sort(sort).await?;
            show(vfs);
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Run the shell until `quit` or end of input
pub async fn run(config: &Config) -> OrbResult<()> {
    let vfs = commands::init(config, config.vfs.clone()).await?;

    let mut events = vfs.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let VfsEvent::StaleResponseDiscarded { epoch } = event {
                debug!("Ignored an outdated response (epoch {})", epoch);
            }
        }
    });

    vfs.fetch().await?;
    show(&vfs);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", style(prompt(&vfs)).bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", style(e).yellow());
                continue;
            }
        };
        match execute(&vfs, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("{} {}", style("error:").red(), e),
        }
    }
    Ok(())
}
