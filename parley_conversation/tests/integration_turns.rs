//! End-to-end turns against a scripted provider and the in-memory store.

use async_trait::async_trait;
use parley_conversation::{ChatGraph, ConversationError, GraphConfig, InMemoryCheckpointer};
use parley_core::{ChatMessage, CheckpointStore, LLMProvider, LLMResponse, Role, Usage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replies from a queue and records every history it was called with.
#[derive(Default)]
struct ScriptedProvider {
    replies: Mutex<VecDeque<anyhow::Result<String>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    fn with_replies(replies: Vec<anyhow::Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn chat(&self, messages: &[ChatMessage], _model: &str) -> anyhow::Result<LLMResponse> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let content = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply left")))?;
        Ok(LLMResponse {
            content,
            usage: Some(Usage {
                prompt_tokens: 1,
                completion_tokens: 1,
                total_tokens: 2,
            }),
        })
    }

    fn get_default_model(&self) -> &'static str {
        "scripted"
    }
}

fn graph(
    provider: Arc<ScriptedProvider>,
) -> (
    ChatGraph<Arc<ScriptedProvider>, Arc<InMemoryCheckpointer>>,
    Arc<InMemoryCheckpointer>,
) {
    let store = Arc::new(InMemoryCheckpointer::new());
    let graph = ChatGraph::new(provider, store.clone(), GraphConfig::new("scripted"));
    (graph, store)
}

#[tokio::test]
async fn two_turns_accumulate_history() {
    let provider = ScriptedProvider::with_replies(vec![
        Ok("Hi! How can I help?".to_string()),
        Ok("Goodbye!".to_string()),
    ]);
    let (graph, store) = graph(provider.clone());

    assert!(store.get("abc").await.unwrap().is_empty());

    let state = graph.invoke("abc", "Hello").await.unwrap();
    assert_eq!(
        state.messages(),
        &[
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi! How can I help?"),
        ]
    );
    assert_eq!(store.get("abc").await.unwrap(), state);

    let state = graph.invoke("abc", "Bye").await.unwrap();
    assert_eq!(
        state.messages(),
        &[
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi! How can I help?"),
            ChatMessage::user("Bye"),
            ChatMessage::assistant("Goodbye!"),
        ]
    );
    assert_eq!(store.get("abc").await.unwrap(), state);
}

#[tokio::test]
async fn model_receives_full_history() {
    let provider = ScriptedProvider::with_replies(vec![
        Ok("Hello there".to_string()),
        Ok("I'm fine".to_string()),
    ]);
    let (graph, _store) = graph(provider.clone());

    graph.invoke("s", "Hi").await.unwrap();
    graph.invoke("s", "How are you?").await.unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], vec![ChatMessage::user("Hi")]);
    assert_eq!(
        calls[1],
        vec![
            ChatMessage::user("Hi"),
            ChatMessage::assistant("Hello there"),
            ChatMessage::user("How are you?"),
        ]
    );
}

#[tokio::test]
async fn each_turn_appends_exactly_one_reply() {
    let provider = ScriptedProvider::with_replies(vec![
        Ok("r1".to_string()),
        Ok("r2".to_string()),
        Ok("r3".to_string()),
    ]);
    let (graph, store) = graph(provider);

    let mut previous = store.get("s").await.unwrap();
    for input in ["a", "b", "c"] {
        let next = graph.invoke("s", input).await.unwrap();
        assert_eq!(next.len(), previous.len() + 2);
        assert_eq!(&next.messages()[..previous.len()], previous.messages());
        assert_eq!(next.messages()[previous.len()].content(), input);
        assert_eq!(next.last().map(ChatMessage::role), Some(Role::Assistant));
        previous = next;
    }
    assert_eq!(previous.turn_count(), 3);
}

#[tokio::test]
async fn failed_turn_leaves_store_unchanged() {
    let provider = ScriptedProvider::with_replies(vec![
        Ok("first".to_string()),
        Err(anyhow::anyhow!("503 Service Unavailable")),
        Ok("recovered".to_string()),
    ]);
    let (graph, store) = graph(provider);

    graph.invoke("s", "one").await.unwrap();
    let before = store.get("s").await.unwrap();
    let step_before = store.checkpoint("s").await.unwrap().unwrap().step;

    let err = graph.invoke("s", "two").await.unwrap_err();
    assert!(matches!(err, ConversationError::Transport(_)));
    assert_eq!(err.to_string(), "503 Service Unavailable");

    assert_eq!(store.get("s").await.unwrap(), before);
    assert_eq!(store.checkpoint("s").await.unwrap().unwrap().step, step_before);

    let state = graph.invoke("s", "two").await.unwrap();
    assert_eq!(state.len(), 4);
    assert_eq!(state.messages()[2].content(), "two");
}

#[tokio::test]
async fn failed_first_turn_creates_nothing() {
    let provider = ScriptedProvider::with_replies(vec![Err(anyhow::anyhow!("unauthorized"))]);
    let (graph, store) = graph(provider);

    assert!(graph.invoke("new", "Hello").await.is_err());
    assert!(store.checkpoint("new").await.unwrap().is_none());
    assert!(store.list_sessions().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_reply_is_stored_as_is() {
    let provider = ScriptedProvider::with_replies(vec![Ok(String::new())]);
    let (graph, store) = graph(provider);

    let state = graph.invoke("s", "Hello").await.unwrap();
    assert_eq!(
        state.messages(),
        &[ChatMessage::user("Hello"), ChatMessage::assistant("")]
    );
    assert_eq!(store.get("s").await.unwrap(), state);
}

#[tokio::test]
async fn sessions_do_not_share_history() {
    let provider =
        ScriptedProvider::with_replies(vec![Ok("to a".to_string()), Ok("to b".to_string())]);
    let (graph, _store) = graph(provider.clone());

    graph.invoke("a", "from a").await.unwrap();
    let b = graph.invoke("b", "from b").await.unwrap();

    assert_eq!(b.len(), 2);
    assert_eq!(provider.calls()[1], vec![ChatMessage::user("from b")]);
}

#[tokio::test]
async fn system_prompt_seeds_only_new_sessions() {
    let provider = ScriptedProvider::with_replies(vec![Ok("r1".to_string()), Ok("r2".to_string())]);
    let store = Arc::new(InMemoryCheckpointer::new());
    let config = GraphConfig::new("scripted").with_system_prompt(Some("Be brief.".to_string()));
    let graph = ChatGraph::new(provider.clone(), store, config);

    graph.invoke("s", "one").await.unwrap();
    let state = graph.invoke("s", "two").await.unwrap();

    let system_count = state
        .messages()
        .iter()
        .filter(|m| m.role() == Role::System)
        .count();
    assert_eq!(system_count, 1);
    assert_eq!(state.messages()[0], ChatMessage::system("Be brief."));
    assert_eq!(provider.calls()[0][0], ChatMessage::system("Be brief."));
}

#[tokio::test]
async fn clear_forgets_session() {
    let provider = ScriptedProvider::with_replies(vec![Ok("r1".to_string()), Ok("r2".to_string())]);
    let (graph, _store) = graph(provider.clone());

    graph.invoke("s", "one").await.unwrap();
    assert!(graph.clear("s").await.unwrap());
    assert!(graph.history("s").await.unwrap().is_empty());

    let state = graph.invoke("s", "again").await.unwrap();
    assert_eq!(state.len(), 2);
    assert_eq!(provider.calls()[1], vec![ChatMessage::user("again")]);
}

#[tokio::test]
async fn works_through_trait_objects() {
    let provider: Arc<dyn LLMProvider> =
        ScriptedProvider::with_replies(vec![Ok("dyn".to_string())]);
    let store: Arc<dyn CheckpointStore> = Arc::new(InMemoryCheckpointer::new());
    let graph: ChatGraph = ChatGraph::new(provider, store, GraphConfig::new("scripted"));

    let state = graph.invoke("s", "hello").await.unwrap();
    assert_eq!(state.last().map(ChatMessage::content), Some("dyn"));
}
