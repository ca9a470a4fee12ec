// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Source validation standing in for a real shader compiler.
//!
//! The checks are shallow: the source must be non-empty, define `main`, and
//! balance its braces. Diagnostics use the `0:<line>: error: <message>` shape
//! GLSL drivers report, so callers see the same kind of log they would get
//! from a real device.

/// What the device remembers about a successfully compiled stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct CompiledSource {
    /// Names of the `uniform mat4` variables the stage declares, in order.
    pub uniforms: Vec<String>,
}

/// Validates `source` and collects its matrix uniforms, or returns a diagnostic log.
pub(crate) fn compile(source: &str) -> Result<CompiledSource, String> {
    if source.trim().is_empty() {
        return Err("0:0: error: empty shader source".to_string());
    }

    let mut depth: i64 = 0;
    let mut has_main = false;
    let mut uniforms = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let code = line.split("//").next().unwrap_or_default();

        for ch in code.chars() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(format!("0:{line_no}: error: unexpected '}}'"));
                    }
                }
                _ => {}
            }
        }

        let tokens: Vec<&str> = code
            .split(|c: char| c.is_whitespace() || c == '(')
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.windows(2).any(|w| w[0] == "void" && w[1] == "main") {
            has_main = true;
        }
        collect_matrix_uniforms(code, &mut uniforms);
    }

    if depth != 0 {
        return Err(format!(
            "0:{}: error: unexpected end of file, {depth} unclosed '{{'",
            source.lines().count()
        ));
    }
    if !has_main {
        return Err("0:0: error: no definition of 'main' found".to_string());
    }

    Ok(CompiledSource { uniforms })
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Appends the names of every `uniform mat4` declared on `code`, including
/// `layout(...)`-qualified and comma-separated declarations.
fn collect_matrix_uniforms(code: &str, uniforms: &mut Vec<String>) {
    const KEYWORD: &str = "uniform";

    for (at, _) in code.match_indices(KEYWORD) {
        let before = code[..at].chars().next_back();
        let rest = &code[at + KEYWORD.len()..];
        if before.is_some_and(is_ident) || rest.starts_with(is_ident) {
            continue;
        }
        let Some(declarators) = rest.trim_start().strip_prefix("mat4") else {
            continue;
        };
        if !declarators.starts_with(char::is_whitespace) {
            continue;
        }
        let declarators = declarators.split(';').next().unwrap_or_default();
        for declarator in declarators.split(',') {
            let name: String = declarator.trim().chars().take_while(|c| is_ident(*c)).collect();
            if !name.is_empty() && !uniforms.contains(&name) {
                uniforms.push(name);
            }
        }
    }
}
