//! Inline HTML pages served to the verifying browser.

use geetest_relay_domain::model::{DiscordId, Game};

/// Page hosting the Geetest widget. The embedded script initializes the
/// widget from the link's `gt`/`challenge` pair and POSTs the solved result
/// back to the relay as JSON.
pub fn challenge_page(game: Game, discord_id: DiscordId, gt: &str, challenge: &str) -> String {
    // Serialized through serde_json so the opaque tokens land in the script
    // as proper JS string literals.
    let widget_config = serde_json::json!({
        "gt": gt,
        "challenge": challenge,
        "offline": false,
        "new_captcha": true,
        "product": "popup",
        "width": "300px",
        "https": true,
    })
    .to_string();
    let submit_url = format!("/geetest/{game}/{discord_id}");

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Daily Sign-in Verification</title>
    <style>
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
            color: #fff;
        }}
        .container {{
            background: rgba(255,255,255,0.05);
            border-radius: 16px;
            padding: 3rem;
            text-align: center;
            border: 1px solid rgba(255,255,255,0.1);
            max-width: 420px;
            width: 90%;
        }}
        h1 {{
            font-size: 1.5rem;
            margin-bottom: 0.5rem;
        }}
        p {{
            color: #a0a0a0;
            margin-bottom: 1.5rem;
        }}
        #captcha {{
            display: flex;
            justify-content: center;
            margin-bottom: 1.5rem;
        }}
        #status {{
            color: #8ab4f8;
            font-size: 0.9rem;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Verification for {game}</h1>
        <p>Discord user {discord_id}</p>
        <div id="captcha"></div>
        <p id="status">Complete the puzzle to finish the daily sign-in.</p>
    </div>
    <script src="https://static.geetest.com/static/tools/gt.js"></script>
    <script>
        initGeetest({widget_config}, function (captcha) {{
            captcha.appendTo("#captcha");
            captcha.onSuccess(function () {{
                var result = captcha.getValidate();
                fetch("{submit_url}", {{
                    method: "POST",
                    headers: {{ "Content-Type": "application/json" }},
                    body: JSON.stringify({{
                        geetest_challenge: result.geetest_challenge,
                        geetest_validate: result.geetest_validate,
                        geetest_seccode: result.geetest_seccode
                    }})
                }})
                    .then(function (resp) {{ return resp.text(); }})
                    .then(function (text) {{
                        document.getElementById("status").textContent = text;
                    }})
                    .catch(function () {{
                        document.getElementById("status").textContent =
                            "Saving the result failed. Please reload and try again.";
                    }});
            }});
        }});
    </script>
</body>
</html>"##
    )
}

/// Error page carrying the human-readable detail of any failed request.
pub fn error_page(detail: &str) -> String {
    let detail = escape_html(detail);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Verification Error</title>
    <style>
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
            color: #fff;
        }}
        .container {{
            background: rgba(255,255,255,0.05);
            border-radius: 16px;
            padding: 3rem;
            text-align: center;
            border: 1px solid rgba(231,76,60,0.4);
            max-width: 420px;
            width: 90%;
        }}
        h1 {{
            font-size: 1.5rem;
            color: #e74c3c;
            margin-bottom: 1rem;
        }}
        p {{
            color: #a0a0a0;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Verification Error</h1>
        <p>{detail}</p>
    </div>
</body>
</html>"#
    )
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
