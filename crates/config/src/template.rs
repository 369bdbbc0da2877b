//! Documented config template written by `aistudio config init`.

/// Generate the config template with a specific port.
pub fn default_config_template(port: u16) -> String {
    format!(
        r##"# AI Studio Gateway Configuration
# ==============================
# Changes require a restart to take effect.
#
# Environment variable substitution is supported: ${{ENV_VAR}} or
# ${{ENV_VAR:-fallback}}. Process environment (PORT, AISTUDIO_ENV,
# FRONTEND_URL, AISTUDIO_PIN, AISTUDIO_WEBHOOK_<CHANNEL>_URL) wins over
# values in this file.

# ══════════════════════════════════════════════════════════════════════════════
# SERVER
# ══════════════════════════════════════════════════════════════════════════════

[server]
bind = "0.0.0.0"                  # Address to bind to
port = {port}                        # Port number
mode = "development"              # "development" or "production"
body_limit_bytes = 10485760       # Maximum request body (10 MiB)

# ══════════════════════════════════════════════════════════════════════════════
# CORS
# ══════════════════════════════════════════════════════════════════════════════
# Development mode allows any localhost origin. Production mode only allows
# the origins below.

[cors]
frontend_url = "https://your-app.vercel.app"
extra_origins = []

# ══════════════════════════════════════════════════════════════════════════════
# AUTHENTICATION
# ══════════════════════════════════════════════════════════════════════════════

[auth]
# pin = "${{AISTUDIO_PIN}}"        # Shared PIN for channels with requires_pin

# ══════════════════════════════════════════════════════════════════════════════
# CHANNELS
# ══════════════════════════════════════════════════════════════════════════════
# Declaring any channel replaces the built-in table.

[channels.social-media]
url = "https://workflow.ccbp.in/webhook-test/effd5adb-e750-4d4b-8fc9-03def3e32aa8"
description = "Social Media Post Generator"
requires_pin = true
hint = "Please provide a URL or content text"

[channels.podcast]
url = "https://workflow.ccbp.in/webhook-test/aea3b229-b06c-454d-9b8c-4ecfd18c899f"
description = "Podcast Generator"
hint = "Please provide a podcast topic"

[channels.thumbnail]
url = "https://workflow.ccbp.in/webhook-test/b0415874-6381-4d46-8a31-015828436686"
description = "Thumbnail Generator"
hint = "Please provide a thumbnail description/prompt"
"##
    )
}
