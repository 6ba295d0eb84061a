/// Single-page chat UI. Opens a session on load and talks to `/api/sessions`.
pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>chatline</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
  aside { width: 260px; padding: 16px; background: #f4f4f6; font-size: 14px; }
  main { flex: 1; max-width: 760px; margin: 0 auto; padding: 16px; display: flex; flex-direction: column; }
  #log { flex: 1; overflow-y: auto; }
  .turn { margin: 8px 0; padding: 10px 12px; border-radius: 8px; white-space: pre-wrap; }
  .user { background: #e8f0fe; }
  .assistant { background: #f1f3f4; }
  .failed { background: #fdecea; }
  .meta { font-size: 11px; color: #777; margin-top: 4px; }
  form { display: flex; gap: 8px; margin-top: 12px; }
  input[type=text] { flex: 1; padding: 10px; font-size: 15px; }
</style>
</head>
<body>
<aside>
  <h3>How to use</h3>
  <ol>
    <li>Type a question below and press Enter.</li>
    <li>Do not enter personal information (real names, phone numbers, student IDs).</li>
    <li>Double-check important decisions against official sources.</li>
  </ol>
  <p><small>This conversation is kept only for this browser session.</small></p>
  <p>
    <label><input type="checkbox" id="reasoning"> Reasoning model</label>
  </p>
  <p><button id="reset">Reset conversation</button></p>
</aside>
<main>
  <h2>chatline</h2>
  <div id="log"></div>
  <form id="ask">
    <input type="text" id="question" placeholder="Ask anything!" autocomplete="off">
    <button type="submit" id="send">Send</button>
  </form>
</main>
<script>
let sessionId = null;
const log = document.getElementById('log');

function render(role, content, meta, failed) {
  const div = document.createElement('div');
  div.className = 'turn ' + (failed ? 'failed' : role);
  div.textContent = content;
  if (meta) {
    const m = document.createElement('div');
    m.className = 'meta';
    m.textContent = meta;
    div.appendChild(m);
  }
  log.appendChild(div);
  log.scrollTop = log.scrollHeight;
  return div;
}

// Error bodies are JSON from the API, but extractor rejections are plain text.
async function readBody(res) {
  const text = await res.text();
  try {
    return JSON.parse(text);
  } catch (_) {
    return { error: text || `HTTP ${res.status}` };
  }
}

async function openSession() {
  try {
    const res = await fetch('/api/sessions', { method: 'POST' });
    const body = await readBody(res);
    if (!res.ok) throw new Error(body.error);
    sessionId = body.id;
    document.getElementById('reasoning').checked = body.profile === 'reasoning';
  } catch (err) {
    render('assistant', 'Could not start a conversation: ' + err.message, null, true);
  }
}

let busy = false;

function setBusy(value) {
  busy = value;
  document.getElementById('question').disabled = value;
  document.getElementById('send').disabled = value;
  document.getElementById('reset').disabled = value;
}

document.getElementById('ask').addEventListener('submit', async (ev) => {
  ev.preventDefault();
  if (busy) return;
  const input = document.getElementById('question');
  const content = input.value.trim();
  if (!content || !sessionId) return;
  input.value = '';
  render('user', content);
  const pending = render('assistant', 'Generating a response...');
  const profile = document.getElementById('reasoning').checked ? 'reasoning' : 'standard';
  setBusy(true);
  try {
    const res = await fetch(`/api/sessions/${sessionId}/messages`, {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ content, profile }),
    });
    const body = await readBody(res);
    pending.remove();
    if (!res.ok) {
      render('assistant', body.error, null, true);
      return;
    }
    render('assistant', body.answer, 'model: ' + body.used_model, body.failed);
  } catch (err) {
    pending.remove();
    render('assistant', 'An error occurred: ' + err.message, null, true);
  } finally {
    setBusy(false);
    input.focus();
  }
});

document.getElementById('reset').addEventListener('click', async () => {
  if (!sessionId || busy) return;
  try {
    const res = await fetch(`/api/sessions/${sessionId}/reset`, { method: 'POST' });
    if (!res.ok) throw new Error((await readBody(res)).error);
    log.innerHTML = '';
  } catch (err) {
    render('assistant', 'Reset failed: ' + err.message, null, true);
  }
});

window.addEventListener('pagehide', () => {
  if (sessionId) fetch(`/api/sessions/${sessionId}`, { method: 'DELETE', keepalive: true });
});

openSession();
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_is_locked_while_a_reply_is_pending() {
        assert!(INDEX_HTML.contains("if (busy) return;"));
        assert!(INDEX_HTML.contains("setBusy(true);"));
        assert!(INDEX_HTML.contains("setBusy(false);"));
    }

    #[test]
    fn failed_requests_clear_the_pending_placeholder() {
        let catch = INDEX_HTML
            .find("} catch (err) {\n    pending.remove();")
            .expect("send handler must catch fetch failures");
        assert!(INDEX_HTML[catch..].contains("} finally {"));
    }

    #[test]
    fn plain_text_error_bodies_are_tolerated() {
        assert!(INDEX_HTML.contains("await res.text()"));
        assert!(!INDEX_HTML.contains("res.json()"));
    }
}
