//! JSDoc formatting for generated declarations.

/// Render documentation lines as a JSDoc block followed by a newline.
///
/// Returns an empty string when there is nothing to document.
pub fn js_docblock(docs: &[String]) -> String {
	match docs {
		[] => String::new(),
		[line] => format!("/** {line} */\n"),
		lines => {
			let body = lines
				.iter()
				.map(|line| {
					if line.is_empty() {
						" *".to_owned()
					} else {
						format!(" * {line}")
					}
				})
				.collect::<Vec<_>>()
				.join("\n");
			format!("/**\n{body}\n */\n")
		}
	}
}
