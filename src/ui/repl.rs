//! 行命令界面：读 stdin，把命令发给核心，打印核心推回的状态

use std::io;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::render;
use crate::app::AppSnapshot;
use crate::domain::SearchQuery;
use crate::messages::app::{AppCommand, AppEvent};

pub const HELP: &str = "\
命令:
  tabs                      列出标签页
  tab <name>                切换标签页
  ls                        列出当前标签页的电台
  next | prev               下一个/上一个电台
  select <n>                播放第 n 个电台
  play | pause | toggle     播放/暂停
  fav [name]                收藏/取消收藏（默认当前电台）
  add <n> <tab>             把第 n 个电台加入标签页
  del [name]                从当前标签页删除电台
  mktab <name>              新建标签页
  mvtab <old> <new>         重命名标签页
  rmtab <name>              删除标签页
  search <text> [country=..] [tag=..]
  history                   最近搜索
  theme <name>              设置主题
  vol <0-100>               音量
  export <path> | import <path>
  refresh                   重新拉取电台目录
  status                    当前状态
  quit";

/// 一行输入解析后的结果
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    App(AppCommand),
    ListTabs,
    ListStations,
    History,
    Status,
    Help,
    Empty,
}

/// 解析一行命令；错误信息直接展示给用户
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(ShellCommand::Empty);
    };
    let args: Vec<&str> = words.collect();

    let app = |cmd: AppCommand| -> Result<ShellCommand, String> { Ok(ShellCommand::App(cmd)) };
    let one = |what: &str| -> Result<String, String> {
        match args.as_slice() {
            [v] => Ok((*v).to_owned()),
            _ => Err(format!("用法: {head} <{what}>")),
        }
    };
    let optional_name = || (!args.is_empty()).then(|| args.join(" "));

    match head {
        "tabs" => Ok(ShellCommand::ListTabs),
        "ls" => Ok(ShellCommand::ListStations),
        "history" => Ok(ShellCommand::History),
        "status" => Ok(ShellCommand::Status),
        "help" | "?" => Ok(ShellCommand::Help),
        "tab" => app(AppCommand::SwitchTab { tab: one("name")? }),
        "next" => app(AppCommand::Next),
        "prev" => app(AppCommand::Prev),
        "select" => app(AppCommand::Select {
            index: parse_position(&one("n")?)?,
        }),
        "play" => app(AppCommand::Play),
        "pause" => app(AppCommand::Pause),
        "toggle" => app(AppCommand::TogglePlay),
        "fav" => app(AppCommand::ToggleFavorite {
            name: optional_name(),
        }),
        "del" => app(AppCommand::DeleteStation {
            name: optional_name(),
        }),
        "add" => match args.as_slice() {
            [n, tab] => app(AppCommand::AddStation {
                index: parse_position(n)?,
                target_tab: (*tab).to_owned(),
            }),
            _ => Err("用法: add <n> <tab>".to_owned()),
        },
        "mktab" => app(AppCommand::CreateTab { name: one("name")? }),
        "mvtab" => match args.as_slice() {
            [old, new] => app(AppCommand::RenameTab {
                old: (*old).to_owned(),
                new: (*new).to_owned(),
            }),
            _ => Err("用法: mvtab <old> <new>".to_owned()),
        },
        "rmtab" => app(AppCommand::DeleteTab { name: one("name")? }),
        "search" => {
            let query = parse_search(&args);
            if query.is_empty() {
                return Err("用法: search <text> [country=..] [tag=..]".to_owned());
            }
            app(AppCommand::Search { query })
        }
        "theme" => app(AppCommand::SetTheme {
            theme: one("name")?,
        }),
        "vol" => {
            let v: u32 = one("0-100")?
                .parse()
                .map_err(|_| "音量应为 0-100 的整数".to_owned())?;
            if v > 100 {
                return Err("音量应为 0-100 的整数".to_owned());
            }
            app(AppCommand::SetVolume {
                volume: v as f32 / 100.0,
            })
        }
        "export" => app(AppCommand::ExportSnapshot {
            path: PathBuf::from(one("path")?),
        }),
        "import" => app(AppCommand::ImportSnapshot {
            path: PathBuf::from(one("path")?),
        }),
        "refresh" => app(AppCommand::RefreshCatalog),
        "quit" | "exit" | "q" => app(AppCommand::Quit),
        other => Err(format!("未知命令: {other}（输入 help 查看帮助）")),
    }
}

/// 界面上的序号从 1 开始
fn parse_position(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("无效的序号: {s}（从 1 开始）")),
    }
}

/// `search` 参数：`key=value` 形式的是过滤条件，其余拼成名字
pub fn parse_search(args: &[&str]) -> SearchQuery {
    let mut query = SearchQuery::default();
    let mut name = Vec::new();
    for arg in args {
        match arg.split_once('=') {
            Some(("country", v)) => query.country = Some(v.to_owned()),
            Some(("tag", v)) => query.tag = Some(v.to_owned()),
            _ => name.push(*arg),
        }
    }
    query.name = name.join(" ");
    query
}

pub async fn run_repl(
    mut app: AppSnapshot,
    tx: mpsc::Sender<AppCommand>,
    mut rx: mpsc::Receiver<AppEvent>,
) -> io::Result<()> {
    let _ = tx.send(AppCommand::Bootstrap).await;
    println!("tabradio 已启动，输入 help 查看命令");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut quitting = false;

    loop {
        tokio::select! {
            evt = rx.recv() => {
                let Some(evt) = evt else {
                    // 核心已退出
                    break;
                };
                match evt {
                    AppEvent::State(s) => app = *s,
                    AppEvent::Toast(msg) => println!("» {msg}"),
                    AppEvent::Error(msg) => println!("错误: {msg}"),
                    AppEvent::NowPlaying { title, playing } => {
                        let verb = if playing { "正在播放" } else { "已暂停" };
                        println!("♪ {verb}: {title}");
                    }
                }
            }
            line = lines.next_line(), if !quitting => {
                let line = match line? {
                    Some(l) => l,
                    None => {
                        quitting = true;
                        let _ = tx.send(AppCommand::Quit).await;
                        continue;
                    }
                };
                match parse_command(&line) {
                    Ok(ShellCommand::App(cmd)) => {
                        quitting = matches!(cmd, AppCommand::Quit);
                        if tx.send(cmd).await.is_err() {
                            break;
                        }
                    }
                    Ok(ShellCommand::ListTabs) => render::print_tabs(&app),
                    Ok(ShellCommand::ListStations) => render::print_rows(&app),
                    Ok(ShellCommand::History) => render::print_history(&app),
                    Ok(ShellCommand::Status) => render::print_snapshot(&app),
                    Ok(ShellCommand::Help) => println!("{HELP}"),
                    Ok(ShellCommand::Empty) => {}
                    Err(msg) => println!("{msg}"),
                }
            }
        }
    }

    Ok(())
}
