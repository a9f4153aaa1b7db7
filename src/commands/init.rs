//! Initialize a new learning site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG: &str = r#"# Site
title: Learning Portal
description: Hands-on security training
language: en

# URL
url: http://localhost:4000
root: /

# Directory
content_dir: content
public_dir: public

# Content listing
page_size: 50
revalidate: 300

# Rendering
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false
meta_generator: true
"#;

/// Sample documents, one per collection: (relative path, text)
const SAMPLES: &[(&str, &str)] = &[
    (
        "instructors/jane-doe.md",
        r#"---
firstName: Jane
lastName: Doe
bio: Incident responder and **detection engineer**.
expertise:
  - Threat hunting
  - KQL
yearsOfExperience: 12
---
"#,
    ),
    (
        "modules/blue-team/log-analysis.mdx",
        r#"---
name: Log Analysis
shortDescription: Read the signals hidden in your logs
description: Learn to query, filter and correlate **security logs**.
instructor: content/instructors/jane-doe.md
difficulty: beginner
durationHours: 3
accessLevel: free
---
"#,
    ),
    (
        "lessons/blue-team/log-analysis/reading-logs.mdx",
        r#"---
name: Reading Logs
module: content/modules/blue-team/log-analysis.mdx
order: 1
durationMinutes: 20
---

import { Callout } from '../components'

## What a log tells you

Every event carries a timestamp, a source and a message.

<Callout type="info" title="Tip">
Start from the **newest** entries and work backwards.
</Callout>

```bash
tail -f /var/log/auth.log
```
"#,
    ),
    (
        "labs/failed-logins.mdx",
        r#"---
name: Failed Logins
shortDescription: Find the brute-force attempt
labType: ctf
description: Investigate an authentication log.
instructions: Search `auth.log` for repeated failures from one address.
difficulty: beginner
durationMinutes: 30
totalPoints: 100
accessLevel: free
flags:
  - name: Attacker address
    description: The IP address behind the attempts
    flagValue: FLAG{203.0.113.7}
    points: 100
---
"#,
    ),
    (
        "tracks/blue-team.mdx",
        r#"---
name: Blue Team Foundations
shortDescription: Detect and respond to common attacks
trackType: career
difficulty: beginner
estimatedHours: 4
steps:
  - order: 1
    stepType: module
    module: content/modules/blue-team/log-analysis.mdx
  - order: 2
    stepType: lab
    lab: content/labs/failed-logins.mdx
    isRequired: false
---
"#,
    ),
    (
        "pages/home.mdx",
        r#"---
title: Welcome
blocks:
  - _template: hero
    tagline: Hands-on training
    headline: Learn security by doing
    text: Guided tracks, focused modules and real labs.
    actions:
      - label: Browse tracks
        link: /tracks/
        type: button
  - _template: stats
    title: By the numbers
    stats:
      - stat: "1"
        type: Track
      - stat: "1"
        type: Lab
  - _template: cta
    title: Ready?
    actions:
      - label: Start the first lab
        link: /labs/failed-logins/
---
"#,
    ),
];

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("A site already exists in {:?}", target_dir);
    }

    fs::create_dir_all(target_dir)?;
    fs::write(&config_path, CONFIG)?;

    let content_dir = target_dir.join("content");
    for (relative, text) in SAMPLES {
        let path = content_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, text)?;
        tracing::debug!("Created {:?}", path);
    }

    Ok(())
}
