//! The agent runtime and its bounded tool loop.

use crate::config::{AgentConfig, ProviderDefaults};
use crate::sink::{self, AutoAllow, EventSink, Gateway};
use anyhow::Result;
use quorum_llm::{Chat, ChatRequest, Message, PriceTable, Provider, Tool, Usage};
use quorum_sandbox::{ROUND_LIMIT_NOTE, Sandbox, TOOL_LIMIT_RESULT, ToolResult};
use std::sync::{Arc, LazyLock};

static DEFAULT_PRICES: LazyLock<PriceTable> = LazyLock::new(PriceTable::default);
static AUTO_ALLOW: AutoAllow = AutoAllow;
static NOOP_SINK: () = ();

/// Where an agent is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentStatus {
    /// Between requests.
    #[default]
    Idle,
    /// Awaiting the provider.
    Thinking,
    /// Executing a tool call.
    Tool,
    /// The last request failed with an uncaught error.
    Error,
}

/// Options for one `send_message` call.
#[derive(Default, Clone, Copy)]
pub struct SendOptions<'a> {
    /// Include (and afterwards update) the agent's private DM history.
    /// Team broadcasts pass `false` — their context is the shared prompt.
    pub include_history: bool,
    /// Permission gateway; defaults to auto-allow.
    pub gateway: Option<&'a dyn Gateway>,
    /// UI event sink; defaults to no-op.
    pub sink: Option<&'a dyn EventSink>,
    /// Rate table for the usage footer; defaults to the built-in rates.
    pub prices: Option<&'a PriceTable>,
}

impl<'a> SendOptions<'a> {
    /// Options for a private DM turn.
    pub fn dm() -> Self {
        Self {
            include_history: true,
            ..Default::default()
        }
    }

    /// Options for a team-broadcast turn (fresh context, auto-allow).
    pub fn broadcast() -> Self {
        Self::default()
    }
}

/// One configured agent: identity, DM history, provider, sandbox handle.
pub struct Agent<C: Chat = Provider> {
    /// The agent's serializable identity.
    pub config: AgentConfig,
    /// Private DM history (user/assistant pairs).
    pub history: Vec<Message>,
    /// Current lifecycle status.
    pub status: AgentStatus,
    provider: C,
    sandbox: Arc<Sandbox>,
}

impl Agent<Provider> {
    /// Bind a real provider adapter and create the agent.
    ///
    /// Fails when the config names a provider with no resolvable API key —
    /// config errors surface at init, not at first request.
    pub fn connect(
        config: AgentConfig,
        defaults: &ProviderDefaults,
        client: reqwest::Client,
        sandbox: Arc<Sandbox>,
    ) -> Result<Self> {
        let provider = config.bind(defaults, client)?;
        Ok(Self::with_provider(config, provider, sandbox))
    }
}

impl<C: Chat> Agent<C> {
    /// Create an agent over an already-built provider (tests inject a
    /// scripted one here).
    pub fn with_provider(config: AgentConfig, provider: C, sandbox: Arc<Sandbox>) -> Self {
        Self {
            config,
            history: Vec::new(),
            status: AgentStatus::Idle,
            provider,
            sandbox,
        }
    }

    /// The bound provider.
    pub fn provider(&self) -> &C {
        &self.provider
    }

    /// The shared sandbox handle.
    pub fn sandbox(&self) -> &Arc<Sandbox> {
        &self.sandbox
    }

    /// The effective system prompt.
    pub fn system_prompt(&self) -> String {
        match &self.config.system_prompt {
            Some(prompt) => prompt.clone(),
            None => format!(
                "You are {}, a {}. You are a coding assistant working in the \
                 user's project directory. Use the available tools to inspect \
                 and modify files when they help. Be concise and concrete.",
                self.config.name, self.config.role
            ),
        }
    }

    /// Clear the private DM history.
    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    /// Send one user message and run the tool loop to completion.
    ///
    /// Returns the accumulated assistant text (all rounds, blank-line
    /// separated) with the usage footer of the last provider response.
    pub async fn send_message(&mut self, text: &str, opts: &SendOptions<'_>) -> Result<String> {
        self.status = AgentStatus::Thinking;
        let result = self.run(text, opts).await;
        match result {
            Ok(output) => {
                self.status = AgentStatus::Idle;
                if opts.include_history {
                    self.history.push(Message::user(text));
                    self.history.push(Message::assistant(&output, &[]));
                }
                Ok(output)
            }
            Err(e) => {
                self.status = AgentStatus::Error;
                Err(e)
            }
        }
    }

    async fn run(&mut self, text: &str, opts: &SendOptions<'_>) -> Result<String> {
        let gateway = opts.gateway.unwrap_or(&AUTO_ALLOW);
        let sink = opts.sink.unwrap_or(&NOOP_SINK);
        let prices = opts.prices.unwrap_or(&DEFAULT_PRICES);

        let system = self.system_prompt();
        let tool_capable = self.config.provider.tool_capable();
        let tools: Vec<Tool> = if tool_capable {
            self.sandbox.definitions()
        } else {
            Vec::new()
        };
        let max_rounds = self.sandbox.policy().max_rounds;
        let ceiling = self.sandbox.policy().ceiling();

        let mut messages: Vec<Message> = if opts.include_history {
            self.history.clone()
        } else {
            Vec::new()
        };
        messages.push(Message::user(text));

        let mut chunks: Vec<String> = Vec::new();
        let mut usage = Usage::default();
        let mut rounds = 0usize;
        let mut calls = 0usize;
        let mut limited = false;

        loop {
            let reply = self
                .provider
                .send(ChatRequest {
                    system: &system,
                    messages: &messages,
                    tools: &tools,
                    model: &self.config.model,
                })
                .await?;
            usage = reply.usage;
            if !reply.text.is_empty() {
                chunks.push(reply.text.clone());
            }
            if reply.tool_calls.is_empty() || !tool_capable {
                break;
            }

            messages.push(Message::assistant(&reply.text, &reply.tool_calls));
            self.status = AgentStatus::Tool;
            for call in &reply.tool_calls {
                let args = call.args();
                let result = if calls >= ceiling {
                    // Past the hard ceiling: synthesize, never dispatch.
                    ToolResult::err(TOOL_LIMIT_RESULT)
                } else {
                    calls += 1;
                    sink.on_tool_call(&call.name, &args);
                    let detail = sink::describe_tool_call(&call.name, &args);
                    let result =
                        if sink::is_dangerous(&call.name) && !gateway.allow(&call.name, &detail) {
                            ToolResult::err(format!("Permission denied by user for {}", call.name))
                        } else {
                            self.sandbox.run(&self.config.id, &call.name, &args).await
                        };
                    sink.on_tool_result(&call.name, result.ok);
                    result
                };
                messages.push(Message::tool(result.content, call.id.clone()));
            }
            self.status = AgentStatus::Thinking;

            rounds += 1;
            if rounds >= max_rounds || calls >= ceiling {
                // Bound reached: the results above are delivered, one final
                // response is elicited, and no further tools run.
                let last = self
                    .provider
                    .send(ChatRequest {
                        system: &system,
                        messages: &messages,
                        tools: &tools,
                        model: &self.config.model,
                    })
                    .await?;
                usage = last.usage;
                if !last.text.is_empty() {
                    chunks.push(last.text);
                }
                limited = true;
                break;
            }
        }

        let mut output = chunks.join("\n\n");
        if limited {
            if !output.is_empty() {
                output.push_str("\n\n");
            }
            output.push_str(ROUND_LIMIT_NOTE);
        }
        output.push_str(&prices.footer(self.config.provider, &usage));
        Ok(output)
    }
}
