//! Snapshot tests for tategaki-core using insta
//!
//! These capture the serialized document tree and page layout handed to renderers, so
//! changes to the wire format show up in review.

use tategaki_core::{divide_into_pages, parse, CharacterCapacity, Orientation, PaginationOptions};

#[test]
fn test_node_tree_json_snapshot() {
    let document = parse("猫と猫［＃「猫」に傍点］が吾輩《わがはい》");
    insta::assert_json_snapshot!(document.nodes, @r###"
    [
      {
        "type": "text",
        "content": "猫と"
      },
      {
        "type": "emphasis_dots",
        "content": "﹅",
        "text": "猫"
      },
      {
        "type": "text",
        "content": "が"
      },
      {
        "type": "ruby",
        "base": "吾輩",
        "reading": "わがはい"
      }
    ]
    "###);
}

#[test]
fn test_scoped_nodes_json_snapshot() {
    let document = parse("［＃ここから２字下げ］［＃１段階小さな文字］注［＃小さな文字終わり］［＃ここで字下げ終わり］");
    insta::assert_json_snapshot!(document.nodes, @r###"
    [
      {
        "type": "block_indent",
        "content": [
          {
            "type": "text_size",
            "content": [
              {
                "type": "text",
                "content": "注"
              }
            ],
            "size": "small",
            "steps": 1
          }
        ],
        "indent": 2
      }
    ]
    "###);
}

#[test]
fn test_summary_snapshot() {
    let document = parse("坊っちゃん\n夏目漱石\n\n親譲りの無鉄砲で");
    insta::assert_json_snapshot!(document.summary(), @r###"
    {
      "title": "坊っちゃん",
      "author": "夏目漱石",
      "length": 20,
      "preview": "坊っちゃん 夏目漱石 親譲りの無鉄砲で"
    }
    "###);
}

#[test]
fn test_page_texts_snapshot() {
    let document = parse("春はあけぼの。やうやう白くなりゆく山ぎは、すこしあかりて。\n夏は夜。");
    let pages = divide_into_pages(
        &document.nodes,
        CharacterCapacity::from_grid(8, 3),
        Orientation::Vertical,
        &PaginationOptions::default(),
    );
    let texts: Vec<String> = pages.iter().map(|page| page.text()).collect();
    insta::assert_debug_snapshot!(texts, @r###"
    [
        "春はあけぼの。やうやう白くなりゆく山ぎは、",
        "すこしあかりて。\n夏は夜。",
    ]
    "###);
}
