//! Fixed document skeleton
//!
//! [`DOCUMENT_TEMPLATE`] is rendered through minijinja with one variable,
//! `data`, holding the already escaped payload. `renderNode` draws one labelled
//! box per node; nodes with children get a connector, a children container with
//! id `children-<path>` and a toggle button whose `aria-controls` names that
//! container. `expanded: false` starts the container hidden and the toggle
//! collapsed.

use crate::error::RenderError;
use minijinja::{context, Environment};

/// Template name; the `.html` suffix turns on auto-escaping, so the slot is
/// marked `safe` and the payload must arrive escaped for a script element
const TEMPLATE_NAME: &str = "mindmap.html";

pub(crate) const DOCUMENT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Synapsis Mind Map</title>
    <style>
        :root {
            --bg-primary: #0a0a0f;
            --bg-card: #1a1a24;
            --bg-hover: #252532;
            --text-primary: #f5f5f7;
            --text-secondary: #8e8e93;
            --border-color: #2c2c3a;
            --accent: #6366f1;
            --line-color: #3a3a4a;
        }
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', -apple-system, sans-serif;
            background: var(--bg-primary);
            min-height: 100vh;
            color: var(--text-primary);
            overflow: auto;
        }
        .app { min-width: fit-content; padding: 40px; display: flex; flex-direction: column; align-items: center; }
        .header { position: fixed; top: 20px; left: 20px; z-index: 100; }
        .badge {
            display: inline-flex; align-items: center; gap: 8px;
            padding: 8px 16px; background: var(--bg-card);
            border: 1px solid var(--border-color); border-radius: 100px;
            font-size: 12px; color: var(--text-secondary);
        }
        .mind-map { display: flex; flex-direction: column; align-items: center; padding-top: 60px; }
        .node { display: flex; flex-direction: column; align-items: center; }
        .node-content {
            display: flex; align-items: center; gap: 10px;
            padding: 12px 20px; background: var(--bg-card);
            border: 1px solid var(--border-color); border-radius: 12px;
            transition: all 0.2s; white-space: nowrap; position: relative;
        }
        .node-content::before {
            content: ''; position: absolute; left: 0; top: 0; bottom: 0; width: 3px;
            border-radius: 12px 0 0 12px; background: var(--node-color, var(--accent));
        }
        .node-content:hover { background: var(--bg-hover); border-color: var(--node-color, var(--accent)); }
        .node-icon { font-size: 18px; }
        .node-text { font-size: 14px; font-weight: 500; }
        .node-root > .node-content { padding: 16px 28px; border: 2px solid var(--accent); }
        .node-root > .node-content .node-text { font-size: 18px; font-weight: 600; }
        .node-connector { width: 2px; height: 24px; background: var(--line-color); }
        .node-children {
            display: flex; flex-direction: row; align-items: flex-start;
            position: relative; padding-top: 24px;
        }
        .hidden { display: none !important; }
        .node-children::before {
            content: ''; position: absolute; top: 0; height: 2px;
            background: var(--line-color); left: 50px; right: 50px;
        }
        .node-branch { display: flex; flex-direction: column; align-items: center; padding: 0 12px; position: relative; }
        .node-branch .node-content { padding: 10px 16px; }
        .node-branch .node-text { font-size: 13px; }
        .node-branch .node-branch .node-text { font-size: 12px; }
        .node-branch .node-branch .node-branch .node-text { font-size: 11px; color: var(--text-secondary); }
        .toggle-btn {
            position: absolute; bottom: -8px; left: 50%; transform: translateX(-50%);
            width: 16px; height: 16px; background: #12121a;
            border: 1px solid var(--border-color); border-radius: 50%;
            color: #636366; cursor: pointer; display: flex;
            align-items: center; justify-content: center; font-size: 8px; z-index: 10;
        }
        .toggle-btn:hover { border-color: var(--accent); color: var(--text-primary); }
        .toggle-btn.collapsed { transform: translateX(-50%) rotate(-90deg); }
    </style>
</head>
<body>
    <div class="app">
        <header class="header"><div class="badge">Synapsis</div></header>
        <div id="mindMap" class="mind-map"></div>
    </div>
    <script>
        const DATA = {{ data|safe }};

        function renderNode(node, path, isRoot) {
            const div = document.createElement('div');
            div.className = isRoot ? 'node node-root' : 'node';

            const content = document.createElement('div');
            content.className = 'node-content';
            if (node.color) content.style.setProperty('--node-color', node.color);

            if (node.icon) {
                const icon = document.createElement('span');
                icon.className = 'node-icon';
                icon.textContent = node.icon;
                content.appendChild(icon);
            }

            const text = document.createElement('span');
            text.className = 'node-text';
            text.textContent = node.title;
            content.appendChild(text);
            div.appendChild(content);

            const children = Array.isArray(node.children) ? node.children : [];
            if (children.length) {
                const collapsed = node.expanded === false;
                const childrenId = 'children-' + path;

                const connector = document.createElement('div');
                connector.className = collapsed ? 'node-connector hidden' : 'node-connector';
                div.appendChild(connector);

                const childrenDiv = document.createElement('div');
                childrenDiv.id = childrenId;
                childrenDiv.className = collapsed ? 'node-children hidden' : 'node-children';
                children.forEach(function (child, index) {
                    const branch = document.createElement('div');
                    branch.className = 'node-branch';
                    branch.appendChild(renderNode(child, path + '-' + index, false));
                    childrenDiv.appendChild(branch);
                });

                const toggle = document.createElement('button');
                toggle.className = collapsed ? 'toggle-btn collapsed' : 'toggle-btn';
                toggle.setAttribute('aria-controls', childrenId);
                toggle.setAttribute('aria-expanded', String(!collapsed));
                toggle.textContent = '▼';
                toggle.onclick = function (event) {
                    event.stopPropagation();
                    const hidden = childrenDiv.classList.toggle('hidden');
                    connector.classList.toggle('hidden', hidden);
                    toggle.classList.toggle('collapsed', hidden);
                    toggle.setAttribute('aria-expanded', String(!hidden));
                };
                content.appendChild(toggle);

                div.appendChild(childrenDiv);
            }
            return div;
        }

        if (DATA && DATA.title !== undefined && DATA.title !== null) {
            document.title = String(DATA.title) + ' - Synapsis';
        }
        document.getElementById('mindMap').appendChild(renderNode(DATA, 'root', true));
    </script>
</body>
</html>
"##;

/// Render the skeleton around an encoded payload
pub(crate) fn compose(payload: &str) -> Result<String, RenderError> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, DOCUMENT_TEMPLATE)?;
    let template = env.get_template(TEMPLATE_NAME)?;
    Ok(template.render(context! { data => payload })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PAYLOAD_PREFIX;

    #[test]
    fn skeleton_has_single_payload_slot() {
        let document = compose("{}").unwrap();
        assert_eq!(document.matches(PAYLOAD_PREFIX).count(), 1);
        assert!(document.contains("const DATA = {};\n"));
        assert!(!document.contains("{{"));
    }

    #[test]
    fn slot_is_not_html_escaped() {
        let document = compose(r#"{"title":"a\u0026b"}"#).unwrap();
        assert!(document.contains(r#"const DATA = {"title":"a\u0026b"};"#));
        assert!(!document.contains("&quot;"));
    }

    #[test]
    fn skeleton_carries_toggle_affordance() {
        assert!(DOCUMENT_TEMPLATE.contains("function renderNode"));
        assert!(DOCUMENT_TEMPLATE.contains("toggle-btn"));
        assert!(DOCUMENT_TEMPLATE.contains("aria-controls"));
        assert!(DOCUMENT_TEMPLATE.contains("node.expanded === false"));
    }

    #[test]
    fn skeleton_has_no_external_assets() {
        let document = compose("{}").unwrap();
        assert!(!document.contains("src=\"http"));
        assert!(!document.contains("<link"));
    }
}
