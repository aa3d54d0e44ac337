//! 模型应答解析
//!
//! 应答遵循两种约定之一：以澄清标记开头的一行问题，或一个
//! 使用受限函数集的围栏代码块。两者都不匹配按格式错误上抛，
//! 周期在不产生运动的情况下结束。
//!
//! 代码块里只认四个调用：`grab()` / `release()` /
//! `move_to_object(n)` / `move_to_place(name)`。其余一律拒绝——
//! 这是对不可信模型输出的信任边界，绝不把生成文本交给宿主执行。

use crate::OperatorError;
use tracing::debug;

/// 澄清问题标记（多语言，按原样匹配应答开头）
const QUESTION_MARKERS: [&str; 3] = ["Question - ", "質問 - ", "クエスチョン -"];

/// 标记与正文之间的分隔符
const QUESTION_SEPARATOR: &str = " - ";

/// 生成代码可触达的全部机器人操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// 开泵抓取
    Grab,

    /// 关泵释放
    Release,

    /// 移动到编号物体
    MoveToObject(usize),

    /// 移动到命名位姿
    MoveToPlace(String),
}

/// 分类后的模型应答
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// 需要转述给操作员的澄清问题
    Question(String),

    /// 待派发的指令序列
    Code(Vec<Instruction>),
}

/// 解析模型应答
pub fn parse_response(text: &str) -> Result<ParsedResponse, OperatorError> {
    for marker in QUESTION_MARKERS {
        if text.starts_with(marker) {
            let remainder = match text.split_once(QUESTION_SEPARATOR) {
                Some((_, rest)) => rest,
                None => text[marker.len()..].trim_start(),
            };
            debug!("response classified as question");
            return Ok(ParsedResponse::Question(remainder.trim().to_string()));
        }
    }

    let body = extract_code_block(text).ok_or_else(|| {
        OperatorError::InvalidResponseFormat(
            "neither a question marker nor a fenced code block".to_string(),
        )
    })?;

    let instructions = parse_instructions(body)?;
    debug!(count = instructions.len(), "response classified as code");
    Ok(ParsedResponse::Code(instructions))
}

/// 提取第一个围栏代码块的正文（语言标签行不算正文）
fn extract_code_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let body_start = after.find('\n')? + 1;
    let body = &after[body_start..];
    let end = body.find("```")?;
    Some(&body[..end])
}

/// 逐行解析代码块正文
///
/// 空行和整行 `#` 注释跳过（模型经常在代码里夹注释），
/// 其余行必须是允许的调用之一。
fn parse_instructions(body: &str) -> Result<Vec<Instruction>, OperatorError> {
    let mut instructions = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        instructions.push(parse_instruction_line(line)?);
    }
    Ok(instructions)
}

fn parse_instruction_line(line: &str) -> Result<Instruction, OperatorError> {
    let unsupported =
        || OperatorError::InvalidResponseFormat(format!("unsupported instruction: {line:?}"));

    let (name, args) = line
        .strip_suffix(')')
        .and_then(|s| s.split_once('('))
        .ok_or_else(unsupported)?;

    let args = args.trim();
    match name.trim() {
        "grab" if args.is_empty() => Ok(Instruction::Grab),
        "release" if args.is_empty() => Ok(Instruction::Release),
        "move_to_object" => {
            let index = args.parse::<usize>().map_err(|_| unsupported())?;
            Ok(Instruction::MoveToObject(index))
        },
        "move_to_place" => {
            let name = strip_quotes(args).ok_or_else(unsupported)?;
            Ok(Instruction::MoveToPlace(name.to_string()))
        },
        _ => Err(unsupported()),
    }
}

/// 去除成对的单引号或双引号
fn strip_quotes(arg: &str) -> Option<&str> {
    let inner = arg
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| arg.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))?;
    (!inner.is_empty()).then_some(inner)
}
